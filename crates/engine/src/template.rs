//! Validated unit-name templates.
//!
//! Unit names are generated from an operator-supplied format string such as
//! `"%(name)s Room %(unit_number)s"`. Only a fixed set of placeholders is
//! recognized, and each template field accepts its own subset; anything else
//! is rejected when the unit group is saved, never at generation time.

use crate::{EngineError, ResultEngine};

/// A placeholder recognized inside a name template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placeholder {
    Name,
    AbbreviatedName,
    UnitNumber,
}

impl Placeholder {
    /// The key as written between `%(` and `)s`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::AbbreviatedName => "abbreviated_name",
            Self::UnitNumber => "unit_number",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A parsed, validated name template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl NameTemplate {
    /// Parses `raw`, accepting only the `allowed` placeholders.
    ///
    /// A template must reference at least one placeholder; a bare literal
    /// would give every unit in the group the same name.
    pub fn parse(raw: &str, allowed: &[Placeholder]) -> ResultEngine<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            match chars.peek() {
                Some((_, '(')) => {
                    chars.next();
                }
                _ => {
                    // A bare '%' is an ordinary character.
                    literal.push(c);
                    continue;
                }
            }

            let rest = &raw[pos..];
            let Some(close) = rest.find(')') else {
                return Err(EngineError::Validation(format!(
                    "unclosed placeholder in format {raw:?}"
                )));
            };
            let key = &rest[2..close];
            if !rest[close + 1..].starts_with('s') {
                return Err(EngineError::Validation(format!(
                    "placeholder %({key}) must end with 's' in format {raw:?}"
                )));
            }

            let placeholder = allowed
                .iter()
                .copied()
                .find(|p| p.key() == key)
                .ok_or_else(|| {
                    EngineError::Validation(format!(
                        "unrecognized placeholder %({key})s in format {raw:?}"
                    ))
                })?;

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(placeholder));

            // Skip past "(key)s".
            for _ in 0..key.len() + 2 {
                chars.next();
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if !segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(_)))
        {
            return Err(EngineError::Validation(format!(
                "format {raw:?} must contain at least one placeholder"
            )));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Renders the template for one unit.
    #[must_use]
    pub fn render(&self, name: &str, abbreviated_name: &str, unit_number: u32) -> String {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(Placeholder::Name) => out.push_str(name),
                Segment::Placeholder(Placeholder::AbbreviatedName) => {
                    out.push_str(abbreviated_name)
                }
                Segment::Placeholder(Placeholder::UnitNumber) => {
                    out.push_str(&unit_number.to_string())
                }
            }
        }
        out
    }

    /// The original format string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &[Placeholder] = &[Placeholder::Name, Placeholder::UnitNumber];
    const ABBR: &[Placeholder] = &[Placeholder::AbbreviatedName, Placeholder::UnitNumber];

    #[test]
    fn renders_default_full_format() {
        let template = NameTemplate::parse("%(name)s Room %(unit_number)s", FULL).unwrap();
        assert_eq!(template.render("Attic", "AT", 4), "Attic Room 4");
    }

    #[test]
    fn renders_default_abbreviated_format() {
        let template = NameTemplate::parse("%(abbreviated_name)sR%(unit_number)s", ABBR).unwrap();
        assert_eq!(template.render("Second Floor", "SF", 2), "SFR2");
    }

    #[test]
    fn keeps_bare_percent_as_literal() {
        let template = NameTemplate::parse("100% %(name)s", FULL).unwrap();
        assert_eq!(template.render("Attic", "AT", 1), "100% Attic");
    }

    #[test]
    fn rejects_unknown_placeholder() {
        let err = NameTemplate::parse("%(floor)s Room %(unit_number)s", FULL).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn rejects_placeholder_from_other_field() {
        assert!(NameTemplate::parse("%(abbreviated_name)s", FULL).is_err());
        assert!(NameTemplate::parse("%(name)s", ABBR).is_err());
    }

    #[test]
    fn rejects_template_without_placeholders() {
        assert!(NameTemplate::parse("Room", FULL).is_err());
    }

    #[test]
    fn rejects_malformed_placeholder() {
        assert!(NameTemplate::parse("%(name", FULL).is_err());
        assert!(NameTemplate::parse("%(name)d", FULL).is_err());
    }
}
