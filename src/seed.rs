//! One-time seed load of the roster from a remote user directory.
//!
//! The fetch runs on its own thread so the event loop keeps drawing while the
//! request is in flight; the loop polls [`SeedLoad`] on every tick and hands
//! the records to the store once they arrive.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::error::SeedError;
use crate::models::{PlayerFields, PlayerId, PlayerRecord};

/// Endpoint the roster is seeded from unless configured otherwise.
pub const DEFAULT_SEED_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// The subset of a remote user entry that the roster cares about. Unknown
/// fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub company: SeedCompany,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCompany {
    pub name: String,
}

impl From<SeedUser> for PlayerRecord {
    fn from(user: SeedUser) -> Self {
        PlayerRecord::new(
            PlayerId::Remote(user.id),
            PlayerFields {
                name: user.name,
                team: format!("Team {}", user.company.name),
                position: format!("Position {}", user.username),
            },
        )
    }
}

/// Decode a seed payload and map every user onto a player record.
pub fn parse_users(body: &str) -> Result<Vec<PlayerRecord>, SeedError> {
    let users: Vec<SeedUser> = serde_json::from_str(body)?;
    Ok(users.into_iter().map(PlayerRecord::from).collect())
}

/// Anything that can produce the initial roster.
pub trait SeedSource {
    fn fetch(&self) -> Result<Vec<PlayerRecord>, SeedError>;
}

/// Production seed source: a single blocking HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    url: String,
    timeout: Duration,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SeedSource for HttpSeedSource {
    #[instrument(skip(self), fields(url = %self.url))]
    fn fetch(&self) -> Result<Vec<PlayerRecord>, SeedError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("player-roster/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()?;

        debug!("requesting seed roster");
        let response = client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        parse_users(&body)
    }
}

/// Handle to a seed fetch running in the background.
pub struct SeedLoad {
    rx: Receiver<Result<Vec<PlayerRecord>, SeedError>>,
}

impl SeedLoad {
    /// Non-blocking check for the result. Returns `None` while the fetch is
    /// still running.
    pub fn poll(&self) -> Option<Result<Vec<PlayerRecord>, SeedError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SeedError::Disconnected)),
        }
    }
}

/// Start fetching the seed roster on a background thread.
pub fn spawn_seed_load<S>(source: S) -> SeedLoad
where
    S: SeedSource + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = source.fetch();
        match &result {
            Ok(records) => info!(count = records.len(), "seed roster fetched"),
            Err(err) => warn!(error = %err, "seed roster unavailable"),
        }
        // The receiver is gone only when the app already quit.
        let _ = tx.send(result);
    });
    SeedLoad { rx }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    struct FixedSource(Result<Vec<PlayerRecord>, u16>);

    impl SeedSource for FixedSource {
        fn fetch(&self) -> Result<Vec<PlayerRecord>, SeedError> {
            match &self.0 {
                Ok(records) => Ok(records.clone()),
                Err(status) => Err(SeedError::Status { status: *status }),
            }
        }
    }

    fn wait_for(load: &SeedLoad) -> Result<Vec<PlayerRecord>, SeedError> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = load.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "seed load never reported");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn maps_user_onto_player() {
        let records = parse_users(
            r#"[{"id":1,"name":"Ann","username":"aann","company":{"name":"Acme"}}]"#,
        )
        .unwrap();

        assert_eq!(
            records,
            vec![PlayerRecord {
                id: PlayerId::Remote(1),
                name: "Ann".into(),
                team: "Team Acme".into(),
                position: "Position aann".into(),
            }]
        );
    }

    #[test]
    fn ignores_extra_user_fields() {
        let body = r#"[{
            "id": 2,
            "name": "Ervin Howell",
            "username": "Antonette",
            "email": "Shanna@melissa.tv",
            "address": {"city": "Wisokyburgh"},
            "company": {"name": "Deckow-Crist", "catchPhrase": "Proactive"}
        }]"#;
        let records = parse_users(body).unwrap();
        assert_eq!(records[0].team, "Team Deckow-Crist");
        assert_eq!(records[0].position, "Position Antonette");
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        assert!(matches!(
            parse_users(r#"{"users": []}"#),
            Err(SeedError::Decode(_))
        ));
        assert!(matches!(
            parse_users(r#"[{"id":1,"name":"Ann"}]"#),
            Err(SeedError::Decode(_))
        ));
    }

    #[test]
    fn background_load_reports_records() {
        let record = PlayerRecord::new(PlayerId::Remote(5), PlayerFields::new("E", "T", "P"));
        let load = spawn_seed_load(FixedSource(Ok(vec![record.clone()])));
        assert_eq!(wait_for(&load).unwrap(), vec![record]);
    }

    #[test]
    fn background_load_reports_failures() {
        let load = spawn_seed_load(FixedSource(Err(503)));
        assert!(matches!(
            wait_for(&load),
            Err(SeedError::Status { status: 503 })
        ));
    }
}
