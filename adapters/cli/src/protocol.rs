//! Line-oriented text protocol spoken with the arena referee.

use std::{fmt::Write as _, io::BufRead};

use arena_warden_core::{
    Action, EntityId, EntityKind, EntitySnapshot, Spell, ThreatSide, TurnSnapshot, UserResources,
    Vector2Int,
};
use thiserror::Error;

const ENTITY_FIELDS: usize = 11;

/// Errors raised while reading the referee's input.
#[derive(Debug, Error)]
pub(crate) enum ParseError {
    /// Reading from the input stream failed.
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),
    /// The stream ended in the middle of a block.
    #[error("input ended on line {line} while expecting {expected}")]
    UnexpectedEnd {
        /// Line number the missing input was expected on.
        line: usize,
        /// Description of the missing input.
        expected: &'static str,
    },
    /// A line carried the wrong number of fields.
    #[error("line {line} has {found} fields, expected {expected}: '{content}'")]
    FieldCount {
        /// Offending line number.
        line: usize,
        /// Number of fields the line must carry.
        expected: usize,
        /// Number of fields found.
        found: usize,
        /// Raw line content.
        content: String,
    },
    /// A field is not a number, or is out of range for its meaning.
    #[error("line {line} field '{field}' has invalid value '{value}'")]
    InvalidNumber {
        /// Offending line number.
        line: usize,
        /// Name of the offending field.
        field: &'static str,
        /// Raw field content.
        value: String,
    },
    /// A numeric code did not match any known variant.
    #[error("line {line} field '{field}' has unknown code {code}")]
    UnknownCode {
        /// Offending line number.
        line: usize,
        /// Name of the offending field.
        field: &'static str,
        /// Code that could not be decoded.
        code: i32,
    },
}

/// Static match description sent once before the first turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MatchHeader {
    /// Position of the base this engine defends.
    pub(crate) base: Vector2Int,
    /// Number of heroes each side controls.
    pub(crate) heroes_per_player: usize,
}

/// Reads protocol blocks from a buffered input, tracking line numbers.
#[derive(Debug)]
pub(crate) struct ProtocolReader<R> {
    input: R,
    line: usize,
    buffer: String,
}

impl<R: BufRead> ProtocolReader<R> {
    pub(crate) fn new(input: R) -> Self {
        Self {
            input,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Reads the two-line match header.
    pub(crate) fn read_header(&mut self) -> Result<MatchHeader, ParseError> {
        let base = self.expect_fields("base position", 2)?;
        let base = Vector2Int::new(
            self.number(&base, 0, "baseX")?,
            self.number(&base, 1, "baseY")?,
        );
        let heroes = self.expect_fields("hero count", 1)?;
        let heroes_per_player = self.number(&heroes, 0, "heroesPerPlayer")?;
        Ok(MatchHeader {
            base,
            heroes_per_player: usize::try_from(heroes_per_player).map_err(|_| {
                ParseError::InvalidNumber {
                    line: self.line,
                    field: "heroesPerPlayer",
                    value: heroes_per_player.to_string(),
                }
            })?,
        })
    }

    /// Reads one turn, or `None` once the input is exhausted.
    pub(crate) fn read_turn(&mut self) -> Result<Option<TurnSnapshot>, ParseError> {
        let Some(first) = self.next_fields()? else {
            return Ok(None);
        };
        let player = self.resources(first)?;
        let opponent = self.expect_fields("opponent resources", 2)?;
        let opponent = self.resources(opponent)?;

        let count = self.expect_fields("entity count", 1)?;
        let count = self.number(&count, 0, "entityCount")?;
        let count = usize::try_from(count).map_err(|_| ParseError::InvalidNumber {
            line: self.line,
            field: "entityCount",
            value: count.to_string(),
        })?;

        let mut entities = Vec::with_capacity(count);
        for _ in 0..count {
            let fields = self.expect_fields("entity", ENTITY_FIELDS)?;
            entities.push(self.entity(&fields)?);
        }

        Ok(Some(TurnSnapshot {
            player,
            opponent,
            entities,
        }))
    }

    fn resources(&self, fields: Vec<String>) -> Result<UserResources, ParseError> {
        self.check_count(&fields, 2)?;
        Ok(UserResources {
            health: self.number(&fields, 0, "health")?,
            mana: self.number(&fields, 1, "mana")?,
        })
    }

    fn entity(&self, fields: &[String]) -> Result<EntitySnapshot, ParseError> {
        let kind = self.number(fields, 1, "type")?;
        let kind = EntityKind::from_code(kind).ok_or(ParseError::UnknownCode {
            line: self.line,
            field: "type",
            code: kind,
        })?;
        let threat = self.number(fields, 10, "threatFor")?;
        let threat_for = match threat {
            -1 => Some(ThreatSide::None),
            code => ThreatSide::from_code(code),
        }
        .ok_or(ParseError::UnknownCode {
            line: self.line,
            field: "threatFor",
            code: threat,
        })?;

        Ok(EntitySnapshot {
            id: EntityId::new(self.number(fields, 0, "id")?),
            kind,
            position: Vector2Int::new(
                self.number(fields, 2, "x")?,
                self.number(fields, 3, "y")?,
            ),
            shield_rounds: self.number(fields, 4, "shieldLife")?,
            is_controlled: self.number(fields, 5, "isControlled")? == 1,
            health: self.number(fields, 6, "health")?,
            trajectory: Vector2Int::new(
                self.number(fields, 7, "vx")?,
                self.number(fields, 8, "vy")?,
            ),
            near_base: self.number(fields, 9, "nearBase")? == 1,
            threat_for,
        })
    }

    fn number(&self, fields: &[String], index: usize, field: &'static str) -> Result<i32, ParseError> {
        let value = fields.get(index).map(String::as_str).unwrap_or_default();
        value.parse().map_err(|_| ParseError::InvalidNumber {
            line: self.line,
            field,
            value: value.to_owned(),
        })
    }

    fn expect_fields(&mut self, expected: &'static str, count: usize) -> Result<Vec<String>, ParseError> {
        let fields = self.next_fields()?.ok_or(ParseError::UnexpectedEnd {
            line: self.line + 1,
            expected,
        })?;
        self.check_count(&fields, count)?;
        Ok(fields)
    }

    fn check_count(&self, fields: &[String], expected: usize) -> Result<(), ParseError> {
        if fields.len() == expected {
            return Ok(());
        }
        Err(ParseError::FieldCount {
            line: self.line,
            expected,
            found: fields.len(),
            content: fields.join(" "),
        })
    }

    fn next_fields(&mut self) -> Result<Option<Vec<String>>, ParseError> {
        loop {
            self.buffer.clear();
            if self.input.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let fields: Vec<String> = self
                .buffer
                .split_whitespace()
                .map(str::to_owned)
                .collect();
            if !fields.is_empty() {
                return Ok(Some(fields));
            }
        }
    }
}

/// Renders `action` as one output line, optionally followed by a label.
pub(crate) fn encode(action: &Action, labels: bool) -> String {
    let mut line = match action {
        Action::Wait => "WAIT".to_owned(),
        Action::Move { position } => format!("MOVE {} {}", position.x(), position.y()),
        Action::Cast { spell } => match spell {
            Spell::Wind { direction } => {
                format!("SPELL WIND {} {}", direction.x(), direction.y())
            }
            Spell::Control { target, direction } => format!(
                "SPELL CONTROL {} {} {}",
                target,
                direction.x(),
                direction.y()
            ),
            Spell::Shield { target } => format!("SPELL SHIELD {target}"),
        },
    };

    if labels {
        let _ = match action {
            Action::Wait => write!(line, " idle"),
            Action::Move { position } => write!(line, " {position}"),
            Action::Cast { spell } => write!(line, " casting {}", spell.kind().name()),
        };
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(input: &str) -> ProtocolReader<&[u8]> {
        ProtocolReader::new(input.as_bytes())
    }

    #[test]
    fn header_reads_base_and_hero_count() {
        let mut input = reader("17630 9000\n3\n");
        let header = input.read_header().expect("header parses");
        assert_eq!(header.base, Vector2Int::new(17_630, 9_000));
        assert_eq!(header.heroes_per_player, 3);
    }

    #[test]
    fn turn_reads_resources_and_entities() {
        let mut input = reader(
            "3 40\n3 10\n2\n\
             0 1 1200 800 0 0 -1 0 0 -1 -1\n\
             17 0 4000 3500 2 1 14 -283 -282 1 1\n",
        );
        let turn = input.read_turn().expect("turn parses").expect("turn present");

        assert_eq!(turn.player, UserResources { health: 3, mana: 40 });
        assert_eq!(turn.opponent.mana, 10);
        assert_eq!(turn.entities.len(), 2);

        let creature = turn.entities[1];
        assert_eq!(creature.id, EntityId::new(17));
        assert_eq!(creature.kind, EntityKind::Creature);
        assert_eq!(creature.shield_rounds, 2);
        assert!(creature.is_controlled);
        assert_eq!(creature.trajectory, Vector2Int::new(-283, -282));
        assert!(creature.near_base);
        assert_eq!(creature.threat_for, ThreatSide::Player);
    }

    #[test]
    fn exhausted_input_ends_cleanly() {
        let mut input = reader("\n");
        assert!(input.read_turn().expect("no error at end").is_none());
    }

    #[test]
    fn truncated_turn_is_an_error() {
        let mut input = reader("3 40\n3 10\n1\n");
        let error = input.read_turn().expect_err("entity line is missing");
        assert!(matches!(
            error,
            ParseError::UnexpectedEnd {
                line: 4,
                expected: "entity"
            }
        ));
    }

    #[test]
    fn malformed_lines_report_their_position() {
        let mut input = reader("3 40\n3 ten\n");
        let error = input.read_turn().expect_err("mana is not a number");
        assert!(matches!(
            error,
            ParseError::InvalidNumber { line: 2, field: "mana", .. }
        ));

        let mut input = reader("3 40\n3 10\n1\n5 7 0 0 0 0 0 0 0 0 0\n");
        let error = input.read_turn().expect_err("entity type is unknown");
        assert!(matches!(
            error,
            ParseError::UnknownCode { line: 4, field: "type", code: 7 }
        ));

        let mut input = reader("3 0\n3 0\n-1\n0 1 0 0 0 0 -1 0 0 -1 -1\n");
        let error = input.read_turn().expect_err("entity count is negative");
        assert!(matches!(
            error,
            ParseError::InvalidNumber { line: 3, field: "entityCount", ref value } if value == "-1"
        ));

        let mut input = reader("3 40 1\n");
        assert!(matches!(
            input.read_turn(),
            Err(ParseError::FieldCount { line: 1, found: 3, .. })
        ));
    }

    #[test]
    fn actions_encode_with_optional_labels() {
        assert_eq!(encode(&Action::Wait, false), "WAIT");
        assert_eq!(
            encode(
                &Action::Move {
                    position: Vector2Int::new(2_000, 2_000)
                },
                true
            ),
            "MOVE 2000 2000 (2000, 2000)"
        );
        assert_eq!(
            encode(
                &Action::Cast {
                    spell: Spell::Control {
                        target: EntityId::new(12),
                        direction: Vector2Int::new(14_630, 6_500),
                    }
                },
                false
            ),
            "SPELL CONTROL 12 14630 6500"
        );
        assert_eq!(
            encode(
                &Action::Cast {
                    spell: Spell::Wind {
                        direction: Vector2Int::new(15_630, 7_000),
                    }
                },
                true
            ),
            "SPELL WIND 15630 7000 casting WIND"
        );
        assert_eq!(
            encode(
                &Action::Cast {
                    spell: Spell::Shield {
                        target: EntityId::new(4)
                    }
                },
                false
            ),
            "SPELL SHIELD 4"
        );
    }
}
