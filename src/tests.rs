//! End-to-end tests driving the command line front end over a SQLite store.

use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use tempfile::TempDir;

use crate::cli::{self, AppState, Cli};
use crate::config::Config;
use crate::db::{init_database, KeyValueStore, SqliteStore, DONORS_KEY, THEME_KEY};
use crate::directory::{AssumeYes, Confirm, StoredDonors};
use crate::errors::{AppError, AppResult};

/// Confirmation that always declines.
struct Decline;

impl Confirm for Decline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// Test fixture for end-to-end tests.
struct TestFixture {
    state: AppState,
    store: Arc<SqliteStore>,
    temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self::open_in(temp_dir, Config::default()).await
    }

    async fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self::open_in(temp_dir, config).await
    }

    async fn open_in(temp_dir: TempDir, mut config: Config) -> Self {
        let db_path = temp_dir.path().join("test.sqlite");
        config.db_path = db_path.clone();

        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let store = Arc::new(SqliteStore::new(pool));
        let state = AppState::open(store.clone(), config)
            .await
            .expect("Failed to open state");

        TestFixture {
            state,
            store,
            temp_dir,
        }
    }

    /// Start a new session over the same database file.
    async fn reopen(self) -> Self {
        let config = (*self.state.config).clone();
        drop(self.state);
        Self::open_in(self.temp_dir, config).await
    }

    async fn run_with(&self, args: &[&str], confirm: &dyn Confirm) -> AppResult<String> {
        let argv = std::iter::once("donor-finder").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).expect("Failed to parse arguments");
        let mut out = Vec::new();
        cli::run(&self.state, cli, confirm, &mut out).await?;
        Ok(String::from_utf8(out).expect("Output is not UTF-8"))
    }

    async fn run(&self, args: &[&str]) -> String {
        self.run_with(args, &AssumeYes).await.unwrap()
    }

    async fn json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        serde_json::from_str(&self.run(&full).await).unwrap()
    }

    async fn add(&self, name: &str, group: &str, area: &str, available: &str) -> i64 {
        let record = self
            .json(&[
                "add",
                "--name",
                name,
                "--blood-group",
                group,
                "--phone",
                "9876543210",
                "--city",
                "Chennai",
                "--area",
                area,
                "--available",
                available,
            ])
            .await;
        record["id"].as_i64().unwrap()
    }
}

fn names(body: &Value) -> Vec<String> {
    body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_empty_directory_notice() {
    let fixture = TestFixture::new().await;

    let output = fixture.run(&["search"]).await;
    assert_eq!(output, "No donors registered yet.\n");

    let body = fixture.json(&["search"]).await;
    assert_eq!(body["outcome"]["status"], "noData");
    assert_eq!(body["cards"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_add_and_list_donor() {
    let fixture = TestFixture::new().await;

    let output = fixture
        .run(&[
            "add",
            "--name",
            "  Asha  ",
            "--blood-group",
            "o+",
            "--phone",
            " 9876543210 ",
            "--city",
            "Chennai",
            "--area",
            "Adyar",
        ])
        .await;
    assert!(output.starts_with("Donor added successfully!"));
    // The directory is re-rendered after the change
    assert!(output.contains("Asha  [O+]"));
    assert!(output.contains("Available now"));

    let body = fixture.json(&["list"]).await;
    assert_eq!(body["outcome"]["status"], "results");
    let donor = &body["outcome"]["donors"][0];
    assert_eq!(donor["name"], "Asha");
    assert_eq!(donor["phone"], "9876543210");
    assert_eq!(donor["bloodGroup"], "O+");
    assert_eq!(donor["available"], "yes");

    let card = &body["cards"][0];
    assert_eq!(card["place"], "Chennai, Adyar");
    assert_eq!(card["distance"], "Distance: Not available");
    assert_eq!(card["links"]["call"], "tel:9876543210");
    assert_eq!(
        card["links"]["whatsapp"],
        "https://wa.me/919876543210?text=Hi%20Asha%2C%20I%20need%20O%2B%20blood%20urgently%20at%20Adyar%2C%20Chennai."
    );
    assert!(card["links"].get("map").is_none());
}

#[tokio::test]
async fn test_add_rejects_invalid_input() {
    let fixture = TestFixture::new().await;

    let bad_phone = fixture
        .run_with(
            &["add", "--name", "Ravi", "--blood-group", "A+", "--phone", "12345"],
            &AssumeYes,
        )
        .await
        .unwrap_err();
    assert!(matches!(bad_phone, AppError::Validation(_)));
    assert_eq!(bad_phone.exit_code(), 1);

    let blank_name = fixture
        .run_with(
            &["add", "--name", "   ", "--blood-group", "A+", "--phone", "9123456789"],
            &AssumeYes,
        )
        .await
        .unwrap_err();
    assert!(matches!(blank_name, AppError::Validation(_)));

    let half_coords = fixture
        .run_with(
            &[
                "add",
                "--name",
                "Ravi",
                "--blood-group",
                "A+",
                "--phone",
                "9123456789",
                "--lat",
                "13.0",
            ],
            &AssumeYes,
        )
        .await
        .unwrap_err();
    assert!(matches!(half_coords, AppError::Validation(_)));

    // Nothing was written
    assert_eq!(fixture.store.get(DONORS_KEY).await.unwrap(), None);
}

#[test]
fn test_unknown_blood_group_is_a_usage_error() {
    let result = Cli::try_parse_from([
        "donor-finder",
        "add",
        "--name",
        "Ravi",
        "--blood-group",
        "C+",
        "--phone",
        "9123456789",
    ]);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_filters_and_no_match_notice() {
    let fixture = TestFixture::new().await;
    fixture.add("Asha", "O+", "Adyar", "yes").await;
    fixture.add("Ravi", "A+", "T. Nagar", "no").await;
    fixture.add("Meena", "O+", "Besant Nagar", "no").await;

    let body = fixture.json(&["search", "--blood-group", "O+"]).await;
    let mut found = names(&body);
    found.sort();
    assert_eq!(found, vec!["Asha", "Meena"]);

    let body = fixture.json(&["search", "--area", "  NAGAR "]).await;
    let mut found = names(&body);
    found.sort();
    assert_eq!(found, vec!["Meena", "Ravi"]);

    let body = fixture
        .json(&["search", "--blood-group", "O+", "--available-only"])
        .await;
    assert_eq!(names(&body), vec!["Asha"]);

    let output = fixture.run(&["search", "--blood-group", "AB-"]).await;
    assert_eq!(output, "No donors found.\n");
}

#[tokio::test]
async fn test_unlocated_results_show_newest_first() {
    let fixture = TestFixture::new().await;
    fixture.add("First", "B+", "Adyar", "yes").await;
    fixture.add("Second", "B+", "Adyar", "yes").await;
    fixture.add("Third", "B+", "Adyar", "yes").await;

    let body = fixture.json(&["search"]).await;
    assert_eq!(names(&body), vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn test_emergency_mode_shows_only_available() {
    let fixture = TestFixture::new().await;
    fixture.add("Asha", "O+", "Adyar", "yes").await;
    fixture.add("Ravi", "O+", "Adyar", "no").await;

    let output = fixture.run(&["search", "--emergency"]).await;
    assert!(output.starts_with("Emergency mode: showing only available donors!\n"));
    assert!(output.contains("Asha"));
    assert!(!output.contains("Ravi"));

    fixture.run(&["clear"]).await;
    fixture.add("Ravi", "O+", "Adyar", "no").await;
    let body = fixture.json(&["search", "--emergency"]).await;
    assert_eq!(body["outcome"]["status"], "noMatches");
}

#[tokio::test]
async fn test_locate_orders_by_distance() {
    let fixture = TestFixture::new().await;

    for (name, lat, lng) in [
        ("Far", "28.6139", "77.2090"),
        ("Near", "13.0067", "80.2570"),
        ("Middle", "12.9716", "77.5946"),
    ] {
        fixture
            .run(&[
                "add",
                "--name",
                name,
                "--blood-group",
                "A-",
                "--phone",
                "9000000001",
                "--lat",
                lat,
                "--lng",
                lng,
            ])
            .await;
    }
    fixture.add("Nowhere", "A-", "Adyar", "yes").await;

    let output = fixture
        .run(&["locate", "--lat", "13.0827", "--lng", "80.2707"])
        .await;
    assert!(output.starts_with("Location set: 13.083, 80.271."));

    let body = fixture.json(&["search"]).await;
    assert_eq!(names(&body), vec!["Near", "Middle", "Far", "Nowhere"]);

    let cards = body["cards"].as_array().unwrap();
    assert!(cards[0]["distance"].as_str().unwrap().ends_with(" km away"));
    assert_eq!(cards[3]["distance"], "Distance: Not available");
    assert_eq!(
        cards[0]["links"]["map"],
        "https://www.google.com/maps?q=13.0067,80.257"
    );

    // Distances are never written back to storage
    let raw = fixture.store.get(DONORS_KEY).await.unwrap().unwrap();
    assert!(!raw.contains("_distance"));
}

#[tokio::test]
async fn test_location_survives_new_session() {
    let fixture = TestFixture::new().await;
    fixture
        .run(&["locate", "--lat", "-33.8688", "--lng", "151.2093"])
        .await;

    let fixture = fixture.reopen().await;
    let location = fixture.state.directory.current_location().await.unwrap();
    assert_eq!(location.lat, -33.8688);

    fixture.run(&["locate", "--forget"]).await;
    let fixture = fixture.reopen().await;
    assert!(fixture.state.directory.current_location().await.is_none());
}

#[tokio::test]
async fn test_locate_without_provider_fails() {
    let fixture = TestFixture::new().await;

    let err = fixture.run_with(&["locate"], &AssumeYes).await.unwrap_err();
    assert!(matches!(err, AppError::LocationUnsupported(_)));
    assert!(err.is_user_facing());
    assert!(fixture.state.directory.current_location().await.is_none());
}

#[tokio::test]
async fn test_locate_uses_configured_location() {
    let config = Config {
        location: crate::models::Coordinates::parse_pair("12.97,77.59"),
        ..Config::default()
    };
    let fixture = TestFixture::with_config(config).await;

    fixture.run(&["locate"]).await;
    let location = fixture.state.directory.current_location().await.unwrap();
    assert_eq!((location.lat, location.lng), (12.97, 77.59));
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let fixture = TestFixture::new().await;
    let id = fixture.add("Asha", "O+", "Adyar", "yes").await;
    let id_arg = id.to_string();

    let err = fixture
        .run_with(&["delete", &id_arg], &Decline)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Cancelled(_)));
    assert_eq!(names(&fixture.json(&["search"]).await), vec!["Asha"]);

    let output = fixture.run(&["--yes", "delete", &id_arg]).await;
    assert!(output.starts_with("Donor deleted!"));
    assert!(output.contains("No donors registered yet."));

    let output = fixture.run(&["delete", &id_arg]).await;
    assert!(output.starts_with(&format!("No donor with id {id}")));
}

#[tokio::test]
async fn test_clear_all() {
    let fixture = TestFixture::new().await;
    fixture.add("Asha", "O+", "Adyar", "yes").await;
    fixture.add("Ravi", "B-", "Adyar", "no").await;

    let err = fixture.run_with(&["clear"], &Decline).await.unwrap_err();
    assert!(matches!(err, AppError::Cancelled(_)));

    let before = fixture.store.revision().await.unwrap();
    let output = fixture.run(&["clear"]).await;
    assert!(output.starts_with("All donors cleared!"));
    assert!(fixture.store.revision().await.unwrap() > before);
    assert_eq!(fixture.store.get(DONORS_KEY).await.unwrap(), None);
    assert_eq!(fixture.run(&["search"]).await, "No donors registered yet.\n");
}

#[tokio::test]
async fn test_corrupt_storage_reads_as_empty() {
    let fixture = TestFixture::new().await;
    fixture.store.set(DONORS_KEY, "{not json").await.unwrap();

    assert_eq!(fixture.run(&["search"]).await, "No donors registered yet.\n");
    assert!(matches!(
        fixture.state.directory.store().inspect().await.unwrap(),
        StoredDonors::Corrupt { .. }
    ));

    // Adding starts a fresh collection
    fixture.add("Asha", "O+", "Adyar", "yes").await;
    assert_eq!(names(&fixture.json(&["search"]).await), vec!["Asha"]);
}

#[tokio::test]
async fn test_records_from_other_writers_load_leniently() {
    let fixture = TestFixture::new().await;
    fixture
        .store
        .set(
            DONORS_KEY,
            r#"[{"id":1,"name":"Old","bloodGroup":"O+","phone":"9876543210","available":"yes"},
                {"id":2,"name":"Odd","bloodGroup":"Q","lat":"x","available":"sometimes"}]"#,
        )
        .await
        .unwrap();

    let body = fixture.json(&["search", "--available-only"]).await;
    assert_eq!(names(&body), vec!["Old"]);

    let body = fixture.json(&["search"]).await;
    assert_eq!(body["cards"][0]["name"], "Odd");
    assert_eq!(body["cards"][0]["bloodGroup"], "");
}

#[tokio::test]
async fn test_theme_defaults_toggles_and_persists() {
    let fixture = TestFixture::new().await;

    assert_eq!(fixture.run(&["theme"]).await, "light\n");
    assert_eq!(
        fixture.store.get(THEME_KEY).await.unwrap().as_deref(),
        Some("light")
    );

    assert_eq!(fixture.run(&["theme", "toggle"]).await, "dark\n");
    let fixture = fixture.reopen().await;
    assert_eq!(fixture.run(&["--json", "theme"]).await, "\"dark\"\n");

    assert_eq!(fixture.run(&["theme", "light"]).await, "light\n");
    assert_eq!(fixture.run(&["theme", "toggle"]).await, "dark\n");
    assert_eq!(fixture.run(&["theme", "toggle"]).await, "light\n");
}

#[tokio::test]
async fn test_theme_follows_system_preference() {
    let config = Config {
        prefers_dark: true,
        ..Config::default()
    };
    let fixture = TestFixture::with_config(config).await;
    assert_eq!(fixture.run(&["theme"]).await, "dark\n");

    // A stored choice wins over the system preference
    fixture.store.set(THEME_KEY, "light").await.unwrap();
    assert_eq!(fixture.run(&["theme"]).await, "light\n");
}

#[tokio::test]
async fn test_intro_types_greeting() {
    let config = Config {
        greeting: "Hi!".to_string(),
        ..Config::default()
    };
    let fixture = TestFixture::with_config(config).await;

    let output = fixture.run(&["intro", "--instant"]).await;
    assert_eq!(output, "\r\rH\rHi\rHi!\n");
}

#[tokio::test]
async fn test_particles_render_requested_frames() {
    let fixture = TestFixture::new().await;

    let output = fixture
        .run(&[
            "particles", "--frames", "3", "--cols", "20", "--rows", "5", "--seed", "7",
        ])
        .await;
    let separators = output
        .lines()
        .filter(|line| *line == "-".repeat(20))
        .count();
    assert_eq!(separators, 3);

    // Same seed, same field
    let again = fixture
        .run(&[
            "particles", "--frames", "3", "--cols", "20", "--rows", "5", "--seed", "7",
        ])
        .await;
    assert_eq!(output, again);
}

#[tokio::test]
async fn test_contact_picks_mail_app_on_mobile() {
    let fixture = TestFixture::new().await;

    let output = fixture
        .run(&[
            "contact",
            "--name",
            "Priya",
            "--email",
            "priya@example.com",
            "--message",
            "Let's talk",
            "--user-agent",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
        ])
        .await;
    assert!(output.starts_with(
        "mailto:kaarthikkishoreg@gmail.com?subject=Portfolio%20Contact%20Message&body=Name%3A%20Priya"
    ));

    let body = fixture
        .json(&[
            "contact",
            "--name",
            "Priya",
            "--email",
            "priya@example.com",
            "--message",
            "Let's talk",
            "--user-agent",
            "Mozilla/5.0 (X11; Linux x86_64)",
        ])
        .await;
    assert_eq!(body["kind"], "webmail");
    assert!(body["url"]
        .as_str()
        .unwrap()
        .starts_with("https://mail.google.com/mail/?view=cm&fs=1&to=kaarthikkishoreg%40gmail.com&su="));
}

#[tokio::test]
async fn test_mutations_publish_revisions() {
    let fixture = TestFixture::new().await;
    let mut changes = fixture.state.directory.subscribe();
    let start = *changes.borrow_and_update();

    fixture.add("Asha", "O+", "Adyar", "yes").await;
    assert!(changes.has_changed().unwrap());
    let after_add = *changes.borrow_and_update();
    assert!(after_add > start);

    // Reads do not publish
    fixture.run(&["search"]).await;
    assert!(!changes.has_changed().unwrap());

    fixture.run(&["clear"]).await;
    assert!(*changes.borrow_and_update() > after_add);
}

#[tokio::test]
async fn test_add_here_uses_current_location() {
    let fixture = TestFixture::new().await;

    let err = fixture
        .run_with(
            &["add", "--name", "Asha", "--blood-group", "O+", "--phone", "9876543210", "--here"],
            &AssumeYes,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(fixture.store.get(DONORS_KEY).await.unwrap(), None);

    fixture
        .run(&["locate", "--lat", "13.0827", "--lng", "80.2707"])
        .await;
    let record = fixture
        .json(&[
            "add",
            "--name",
            "Asha",
            "--blood-group",
            "O+",
            "--phone",
            "9876543210",
            "--here",
        ])
        .await;
    assert_eq!(record["lat"], 13.0827);
    assert_eq!(record["lng"], 80.2707);

    let body = fixture.json(&["search"]).await;
    assert_eq!(body["cards"][0]["distance"], "0.00 km away");
}

#[test]
fn test_add_here_conflicts_with_explicit_coordinates() {
    let result = Cli::try_parse_from([
        "donor-finder",
        "add",
        "--name",
        "Asha",
        "--blood-group",
        "O+",
        "--phone",
        "9876543210",
        "--lat",
        "1.0",
        "--here",
    ]);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_locate_rejects_out_of_range_coordinates() {
    let fixture = TestFixture::new().await;

    let err = fixture
        .run_with(&["locate", "--lat", "200", "--lng", "0"], &AssumeYes)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.message().contains("out of range"));
    assert!(fixture.state.directory.current_location().await.is_none());
}

#[tokio::test]
async fn test_delete_unknown_id_changes_nothing() {
    let fixture = TestFixture::new().await;
    fixture.add("Asha", "O+", "Adyar", "yes").await;
    let before = fixture.store.revision().await.unwrap();

    let output = fixture.run(&["delete", "42"]).await;
    assert_eq!(output, "No donor with id 42; nothing deleted.\n");
    assert_eq!(fixture.store.revision().await.unwrap(), before);
}

#[tokio::test]
async fn test_unreadable_entries_do_not_wipe_the_directory() {
    let fixture = TestFixture::new().await;
    fixture
        .store
        .set(
            DONORS_KEY,
            r#"[{"id":1,"name":"Keep","bloodGroup":"O+","phone":"9876543210","available":"yes"},"junk"]"#,
        )
        .await
        .unwrap();

    fixture.add("New", "A+", "Adyar", "yes").await;
    let mut found = names(&fixture.json(&["search"]).await);
    found.sort();
    assert_eq!(found, vec!["Keep", "New"]);
}
