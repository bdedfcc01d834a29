use clap::Parser;
use domainsift::{
    cli, open_gateway, Args, Backend, DomainFilter, DomainRecord, DomainStatus,
    MissingDataPolicy, SavePolicy, Session, Settings, SyncError,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PASTE: &str = "HTTPS://Example.COM/\n  test.org  \nexample.com\n\nhttp://news.site/\n";

fn load(backend: Backend, dir: &TempDir, policy: SavePolicy) -> Session {
    let path = dir.path().join(backend.default_store());
    Session::load(open_gateway(backend, path, MissingDataPolicy::Empty), policy).unwrap()
}

fn import_and_reload(backend: Backend) {
    let dir = TempDir::new().unwrap();

    let mut session = load(backend, &dir, SavePolicy::Manual);
    assert!(session.collection().is_empty());

    let analysis = session.analyze(PASTE).clone();
    assert_eq!(analysis.unique, vec!["example.com", "test.org", "news.site"]);
    assert_eq!(analysis.duplicates, vec!["example.com"]);

    assert_eq!(session.append_unique(), 3);
    session.sync().unwrap();

    let mut reloaded = load(backend, &dir, SavePolicy::OnStatusChange);
    assert_eq!(reloaded.collection(), session.collection());

    let second = reloaded.analyze("test.org\nfresh.io").clone();
    assert_eq!(second.unique, vec!["fresh.io"]);
    assert_eq!(second.duplicates, vec!["test.org"]);

    let target = reloaded.collection().records()[1].id.clone();
    assert!(reloaded.set_status(&target, DomainStatus::Copied).unwrap());
    assert!(!reloaded.has_unsaved_changes());

    let after = load(backend, &dir, SavePolicy::Manual);
    let copied = DomainFilter {
        search: None,
        status: Some(DomainStatus::Copied),
    };
    assert_eq!(after.collection().export(&copied), "test.org");
    assert_eq!(after.stats().copied_percent, 33);
}

#[test]
fn json_backend_round_trip() {
    import_and_reload(Backend::Json);
}

#[test]
fn sqlite_backend_round_trip() {
    import_and_reload(Backend::Sqlite);
}

#[test]
fn fetch_then_save_leaves_store_unchanged() {
    for backend in [Backend::Json, Backend::Sqlite] {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(backend.default_store());
        let gateway = open_gateway(backend, &path, MissingDataPolicy::Fail);

        let mut session = load(backend, &dir, SavePolicy::Manual);
        session.analyze("a.com\nb.com\nc.com");
        session.append_unique();
        session.sync().unwrap();

        let first = gateway.fetch_all().unwrap();
        gateway.save_all(&first).unwrap();
        assert_eq!(gateway.fetch_all().unwrap(), first);
    }
}

#[test]
fn strict_policy_refuses_missing_store() {
    let dir = TempDir::new().unwrap();
    let gateway = open_gateway(
        Backend::Sqlite,
        dir.path().join("absent.db"),
        MissingDataPolicy::Fail,
    );
    assert!(matches!(
        Session::load(gateway, SavePolicy::Manual),
        Err(SyncError::NotFound(_))
    ));
}

#[test]
fn collection_transfers_between_backends() {
    let dir = TempDir::new().unwrap();
    let mut source = load(Backend::Json, &dir, SavePolicy::Manual);
    source.analyze("one.com\ntwo.com");
    source.append_unique();
    source.sync().unwrap();

    let target = open_gateway(
        Backend::Sqlite,
        dir.path().join("copy.db"),
        MissingDataPolicy::Fail,
    );
    target.save_all(source.collection().records()).unwrap();
    assert_eq!(target.fetch_all().unwrap(), source.collection().records());
}

fn settings_for(store: &Path, argv: &[&str]) -> (Args, Settings) {
    let store = store.to_str().unwrap();
    let mut full = vec!["domainsift", "--store", store];
    full.extend_from_slice(argv);
    let args = Args::try_parse_from(full).unwrap();
    let settings = Settings::from_args(&args).unwrap();
    (args, settings)
}

fn run_command(store: &Path, argv: &[&str]) -> Session {
    let (args, settings) = settings_for(store, argv);
    let mut session = Session::load(settings.gateway(), settings.save_policy).unwrap();
    cli::execute(&mut session, &args.command, &settings).unwrap();
    session
}

fn seed(store: &Path, urls: &[&str]) -> Vec<DomainRecord> {
    let records: Vec<DomainRecord> = urls.iter().map(|url| DomainRecord::new(*url)).collect();
    open_gateway(Backend::Json, store, MissingDataPolicy::Fail)
        .save_all(&records)
        .unwrap();
    records
}

fn stored(store: &Path) -> Vec<DomainRecord> {
    open_gateway(Backend::Json, store, MissingDataPolicy::Fail)
        .fetch_all()
        .unwrap()
}

fn paste_file(dir: &TempDir) -> PathBuf {
    let input = dir.path().join("paste.txt");
    fs::write(&input, PASTE).unwrap();
    input
}

#[test]
fn import_dry_run_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("domains.json");
    let input = paste_file(&dir);

    let session = run_command(&store, &["import", input.to_str().unwrap(), "--dry-run"]);
    assert_eq!(session.analysis().unique.len(), 3);
    assert!(session.collection().is_empty());
    assert!(!store.exists());

    seed(&store, &["example.com"]);
    let before = fs::read_to_string(&store).unwrap();
    let session = run_command(&store, &["import", input.to_str().unwrap(), "--dry-run"]);
    assert_eq!(session.analysis().duplicates, vec!["example.com", "example.com"]);
    assert_eq!(session.collection().len(), 1);
    assert_eq!(fs::read_to_string(&store).unwrap(), before);
}

#[test]
fn import_is_saved_when_the_run_ends() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("domains.json");
    let input = paste_file(&dir);

    let session = run_command(&store, &["import", input.to_str().unwrap()]);
    assert!(!session.has_unsaved_changes());
    assert!(session.last_sync().is_some());
    assert_eq!(stored(&store), session.collection().records());

    let urls: Vec<String> = stored(&store).into_iter().map(|record| record.url).collect();
    assert_eq!(urls, vec!["example.com", "test.org", "news.site"]);
}

#[test]
fn read_only_commands_do_not_write() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("domains.json");
    seed(&store, &["a.com", "b.com"]);
    let before = fs::read_to_string(&store).unwrap();

    for argv in [&["list"][..], &["stats"], &["export", "--search", "a"]] {
        let mut session = run_command(&store, argv);
        assert!(session.last_sync().is_none(), "{argv:?}");
        assert!(session.take_notices().is_empty(), "{argv:?}");
    }
    assert_eq!(fs::read_to_string(&store).unwrap(), before);
}

#[test]
fn no_save_keeps_changes_in_memory() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("domains.json");
    let records = seed(&store, &["a.com", "b.com", "c.com"]);
    let input = paste_file(&dir);

    let session = run_command(&store, &["--no-save", "import", input.to_str().unwrap()]);
    assert_eq!(session.collection().len(), 6);
    assert!(session.has_unsaved_changes());
    assert_eq!(stored(&store), records);

    let session = run_command(
        &store,
        &["--no-save", "--save-policy", "manual", "remove", records[1].id.as_str()],
    );
    assert_eq!(session.collection().len(), 2);
    assert!(session.has_unsaved_changes());
    assert_eq!(stored(&store), records);
}

#[test]
fn export_mark_copied_flips_only_filtered_records() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("domains.json");
    seed(&store, &["alpha.com", "beta.org", "gamma.com"]);

    run_command(&store, &["export", "--search", ".COM", "--mark-copied"]);
    let statuses: Vec<(String, DomainStatus)> = stored(&store)
        .into_iter()
        .map(|record| (record.url, record.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("alpha.com".to_string(), DomainStatus::Copied),
            ("beta.org".to_string(), DomainStatus::Pending),
            ("gamma.com".to_string(), DomainStatus::Copied),
        ]
    );

    // Under the manual policy the end of the run does the write.
    run_command(
        &store,
        &["--save-policy", "manual", "export", "--status", "pending", "--mark-copied"],
    );
    assert!(stored(&store)
        .iter()
        .all(|record| record.status == DomainStatus::Copied));
}

#[test]
fn transfer_writes_into_nested_sqlite_store() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("domains.json");
    let records = seed(&store, &["one.com", "two.com"]);
    let target = dir.path().join("backup/2024/domains.db");

    run_command(
        &store,
        &["transfer", "--to", "sqlite", "--to-store", target.to_str().unwrap()],
    );

    let copied = open_gateway(Backend::Sqlite, &target, MissingDataPolicy::Fail)
        .fetch_all()
        .unwrap();
    assert_eq!(copied, records);
    assert_eq!(stored(&store), records);
}

#[test]
fn wrapped_document_is_refused_under_strict_policy() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("domains.json");
    let wrapped = r#"{"domains":[{"id":"1","url":"keep.com","createdAt":"2024-01-01T00:00:00Z"}]}"#;
    fs::write(&store, wrapped).unwrap();

    let (_, settings) = settings_for(&store, &["--on-missing", "fail", "stats"]);
    assert!(matches!(
        Session::load(settings.gateway(), settings.save_policy),
        Err(SyncError::NotAnArray(_))
    ));
    assert_eq!(fs::read_to_string(&store).unwrap(), wrapped);
}
