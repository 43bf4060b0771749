//! Domain models for the roster. These stay plain data holders so the store
//! can own every rule about how they change, and the UI and export layers only
//! ever read them.

use std::fmt;

/// Identifier of a player record.
///
/// Seeded records keep the id handed out by the remote source, while records
/// created in this session draw from a local counter. Keeping the two apart
/// in separate variants means a locally created id can never shadow a seeded
/// one, whatever numbers the remote source happens to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerId {
    /// Id copied verbatim from the seed source.
    Remote(u64),
    /// Id assigned by the store when a draft is committed.
    Local(u64),
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::Remote(id) => write!(f, "{id}"),
            PlayerId::Local(id) => write!(f, "L{id}"),
        }
    }
}

/// The three editable text fields of a player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerField {
    Name,
    Team,
    Position,
}

impl PlayerField {
    /// All fields in form order.
    pub const ALL: [PlayerField; 3] = [PlayerField::Name, PlayerField::Team, PlayerField::Position];

    /// Label shown next to the input and in exported documents.
    pub fn label(self) -> &'static str {
        match self {
            PlayerField::Name => "Name",
            PlayerField::Team => "Team",
            PlayerField::Position => "Position",
        }
    }
}

/// Free-text values of a player without an identity attached. Used both for
/// the draft and as the payload of a committed record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFields {
    /// Player's display name. Also the stem of the exported PDF's file name.
    pub name: String,
    /// Team label, kept as free text so seeded values like "Team Acme" and
    /// hand-typed ones sit side by side.
    pub team: String,
    /// Playing position, free text for the same reason as `team`.
    pub position: String,
}

impl PlayerFields {
    /// Build a set of values from anything string-like. Mostly used by tests
    /// and the seed mapping, where literals are the common case.
    pub fn new(
        name: impl Into<String>,
        team: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
            position: position.into(),
        }
    }

    /// Read one field by name so the form can treat the three inputs alike.
    pub fn get(&self, field: PlayerField) -> &str {
        match field {
            PlayerField::Name => &self.name,
            PlayerField::Team => &self.team,
            PlayerField::Position => &self.position,
        }
    }

    /// Mutable counterpart of [`PlayerFields::get`], used when the draft is
    /// updated one keystroke at a time.
    pub fn get_mut(&mut self, field: PlayerField) -> &mut String {
        match field {
            PlayerField::Name => &mut self.name,
            PlayerField::Team => &mut self.team,
            PlayerField::Position => &mut self.position,
        }
    }

    /// Fields with no text at all. Whitespace counts as text: the only check
    /// on create is that something was entered.
    pub fn missing(&self) -> Vec<PlayerField> {
        PlayerField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .collect()
    }

    /// Whether every field has something in it, i.e. a create would succeed.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Whether nothing has been typed into any field.
    pub fn is_blank(&self) -> bool {
        self.missing().len() == PlayerField::ALL.len()
    }
}

/// A committed roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    /// Unique within the roster. Edit, delete and update all look records up
    /// by this id, never by position.
    pub id: PlayerId,
    /// Display name shown in the first table column.
    pub name: String,
    /// Team label shown in the second table column.
    pub team: String,
    /// Position label shown in the third table column.
    pub position: String,
}

impl PlayerRecord {
    pub fn new(id: PlayerId, fields: PlayerFields) -> Self {
        Self {
            id,
            name: fields.name,
            team: fields.team,
            position: fields.position,
        }
    }

    /// Copy the editable values out so they can seed a draft.
    pub fn fields(&self) -> PlayerFields {
        PlayerFields {
            name: self.name.clone(),
            team: self.team.clone(),
            position: self.position.clone(),
        }
    }

    /// `(label, value)` pairs in display order. Export and print share this
    /// so both documents list the same rows.
    pub fn labeled_values(&self) -> [(&'static str, &str); 3] {
        [
            (PlayerField::Name.label(), &self.name),
            (PlayerField::Team.label(), &self.team),
            (PlayerField::Position.label(), &self.position),
        ]
    }
}

impl fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_provenance() {
        assert_eq!(PlayerId::Remote(7).to_string(), "7");
        assert_eq!(PlayerId::Local(7).to_string(), "L7");
        assert_ne!(PlayerId::Remote(7), PlayerId::Local(7));
    }

    #[test]
    fn only_empty_fields_count_as_missing() {
        let fields = PlayerFields::new("Ann", "  ", "");
        assert_eq!(fields.missing(), vec![PlayerField::Position]);
        assert!(!fields.is_complete());
        assert!(!fields.is_blank());

        assert!(PlayerFields::new(" ", " ", " ").is_complete());
        assert!(!PlayerFields::new(" ", "", "").is_blank());
        assert!(PlayerFields::default().is_blank());
    }

    #[test]
    fn labeled_values_follow_form_order() {
        let record = PlayerRecord::new(
            PlayerId::Local(1),
            PlayerFields::new("Ann", "Team Acme", "Position aann"),
        );
        assert_eq!(
            record.labeled_values(),
            [
                ("Name", "Ann"),
                ("Team", "Team Acme"),
                ("Position", "Position aann"),
            ]
        );
    }
}
