//! Integration tests for the file-system stores against temporary
//! directories.

use std::fs;

use forge_core::{
  assessment::{AssessmentSource, Dimension},
  idea::{Idea, Reference, Score, Tags},
  overlay::{ScoreSource, resolve_scores},
  provenance,
  repository::Repository,
};
use tempfile::TempDir;

use crate::{Error, FsAssessmentStore, LogArchiveLoader, RepoFile, load_archives, week_key};

fn tmp() -> TempDir { TempDir::new().expect("temp dir") }

fn sample_repo() -> Repository {
  let mut verbs = Idea::new("I-FUNC-ARCH-VERBS", "Functional architecture verbs");
  verbs.description = "Treat verbs as the unit of architecture.".into();
  verbs.maturity_score = Score::new("maturity_score", 5).unwrap();
  verbs.personal_interest_score = Score::new("personal_interest_score", 7).unwrap();
  verbs.trend_score = Score::new("trend_score", 3).unwrap();
  verbs.tags = Tags::parse("architecture, naming");
  verbs.related_items = vec![Reference {
    week:    "2024-W05".into(),
    item_id: "A1".into(),
    section: "notes".into(),
  }];

  [verbs, Idea::new("I-002", "Second idea")].into_iter().collect()
}

// ─── Repository file ─────────────────────────────────────────────────────────

#[test]
fn repo_save_then_load_round_trips() {
  let dir = tmp();
  let file = RepoFile::new(dir.path().join("REPOSITORY/repo.json"));
  let repo = sample_repo();

  file.save(&repo).unwrap();
  assert_eq!(file.load().unwrap(), Some(repo));
}

#[test]
fn repo_missing_file_loads_as_none() {
  let dir = tmp();
  let file = RepoFile::new(dir.path().join("absent.json"));
  assert!(file.load().unwrap().is_none());
}

#[test]
fn repo_malformed_file_is_reported() {
  let dir = tmp();
  let path = dir.path().join("repo.json");
  fs::write(&path, "[{\"idea_id\": ").unwrap();

  let err = RepoFile::new(&path).load().unwrap_err();
  assert!(matches!(err, Error::MalformedRepository { .. }));
}

#[test]
fn repo_file_is_a_plain_array_with_every_field() {
  let dir = tmp();
  let path = dir.path().join("repo.json");
  RepoFile::new(&path).save(&sample_repo()).unwrap();

  let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
  let first = &raw[0];
  for field in [
    "idea_id",
    "title",
    "description",
    "maturity_score",
    "personal_interest_score",
    "trend_score",
    "tags",
    "related_items",
  ] {
    assert!(first.get(field).is_some(), "missing {field}");
  }
  assert_eq!(first["tags"], serde_json::json!(["architecture", "naming"]));
}

#[test]
fn repo_save_failure_leaves_memory_intact() {
  let dir = tmp();
  // The parent "directory" is a regular file, so the write cannot succeed.
  let blocker = dir.path().join("blocker");
  fs::write(&blocker, "").unwrap();
  let file = RepoFile::new(blocker.join("repo.json"));

  let repo = sample_repo();
  let err = file.save(&repo).unwrap_err();
  assert!(matches!(err, Error::Persistence { .. }));
  assert_eq!(repo.len(), 2);
}

// ─── Log archives ────────────────────────────────────────────────────────────

const WEEK_ONE: &str = r#"{
  "metadata": { "tools_used": ["tool1"], "tags": ["weekly"], "generated_at": "2024-02-04" },
  "items": { "notes": [{ "id": "A1", "text": "x" }] }
}"#;

#[test]
fn week_key_strips_the_extension() {
  assert_eq!(week_key("logs/2024-W05.json".as_ref(), "json").as_deref(), Some("2024-W05"));
  assert_eq!(week_key("logs/2024-W05.md".as_ref(), "md").as_deref(), Some("2024-W05"));
  assert_eq!(week_key("logs/README".as_ref(), "md").as_deref(), Some("README"));
}

#[test]
fn archives_merge_structured_and_narrative_sources() {
  let dir = tmp();
  let json = dir.path().join("W1.json");
  let md_same = dir.path().join("W1.md");
  let md_only = dir.path().join("W2.md");
  fs::write(&json, WEEK_ONE).unwrap();
  fs::write(&md_same, "# W1 narrative").unwrap();
  fs::write(&md_only, "# W2 narrative").unwrap();

  let load = load_archives([&json], [&md_same, &md_only]);
  assert!(load.failures.is_empty());

  let w1 = load.index.get("W1").unwrap();
  assert_eq!(w1.metadata.as_ref().unwrap().tools_used, ["tool1"]);
  assert_eq!(w1.narrative.as_deref(), Some("# W1 narrative"));

  let w2 = load.index.get("W2").unwrap();
  assert!(w2.items.is_empty());
  assert_eq!(w2.narrative.as_deref(), Some("# W2 narrative"));
}

#[test]
fn bad_sources_are_reported_without_aborting_the_load() {
  let dir = tmp();
  let good = dir.path().join("W1.json");
  let bad = dir.path().join("W3.json");
  let gone = dir.path().join("W4.json");
  fs::write(&good, WEEK_ONE).unwrap();
  fs::write(&bad, "{ not json").unwrap();

  let load = load_archives([&bad, &good, &gone], Vec::<&std::path::Path>::new());
  assert!(load.index.get("W1").is_some());
  assert!(load.index.get("W3").is_none());
  assert_eq!(load.failures.len(), 2);
  assert!(matches!(load.failures[0].error, Error::MalformedArchive { .. }));
  assert!(matches!(load.failures[1].error, Error::Persistence { .. }));
}

#[test]
fn loader_reads_directories_by_extension() {
  let dir = tmp();
  let json_dir = dir.path().join("json-logs");
  let md_dir = dir.path().join("md-logs");
  fs::create_dir_all(&json_dir).unwrap();
  fs::create_dir_all(&md_dir).unwrap();
  fs::write(json_dir.join("W1.json"), WEEK_ONE).unwrap();
  fs::write(json_dir.join("notes.txt"), "ignored").unwrap();
  fs::write(md_dir.join("W1.md"), "prose").unwrap();

  let load = LogArchiveLoader::from_dirs(&json_dir, &md_dir).load();
  assert!(load.failures.is_empty());
  assert_eq!(load.index.weeks().collect::<Vec<_>>(), ["W1"]);
  assert_eq!(load.index.get("W1").unwrap().narrative.as_deref(), Some("prose"));
}

#[test]
fn loader_tolerates_missing_directories() {
  let dir = tmp();
  let load = LogArchiveLoader::from_dirs(dir.path().join("nope"), dir.path().join("nada")).load();
  assert!(load.index.is_empty());
  assert!(load.failures.is_empty());
}

#[test]
fn loaded_archives_feed_the_provenance_resolver() {
  let dir = tmp();
  let json = dir.path().join("W1.json");
  fs::write(&json, WEEK_ONE).unwrap();
  let load = load_archives([&json], Vec::<&std::path::Path>::new());

  let mut idea = Idea::new("I-001", "Example");
  idea.related_items = ["A1", "A2"]
    .into_iter()
    .map(|id| Reference { week: "W1".into(), item_id: id.into(), section: "notes".into() })
    .collect();

  let text = provenance::resolve(&idea, &load.index).to_string();
  assert_eq!(text.matches("### Week Metadata:").count(), 1);
  assert!(text.contains("- Generated: 2024-02-04"));
  assert!(text.contains("⚠️ Item A2 not found in section notes"));
}

#[test]
fn id_less_items_do_not_hide_their_week() {
  let dir = tmp();
  let json = dir.path().join("W1.json");
  fs::write(
    &json,
    r#"{
      "items": {
        "notes":   [{ "text": "x", "id": "A1" }],
        "summary": [{ "text": "no id here" }]
      }
    }"#,
  )
  .unwrap();
  let load = load_archives([&json], Vec::<&std::path::Path>::new());
  assert!(load.failures.is_empty());

  let mut idea = Idea::new("I-001", "Example");
  idea.related_items =
    vec![Reference { week: "W1".into(), item_id: "A1".into(), section: "notes".into() }];

  let text = provenance::resolve(&idea, &load.index).to_string();
  assert!(!text.contains("No source data found for week"));
  assert!(text.contains("\"text\": \"x\""));
}

// ─── Assessments ─────────────────────────────────────────────────────────────

const TREND: &str =
  r#"{"trend_score": 8, "justification": "gaining traction", "suggested_tags": ["emerging"]}"#;

#[test]
fn assessment_paths_follow_the_naming_convention() {
  let store = FsAssessmentStore::new("/evals");
  assert_eq!(
    store.path_for("I-FUNC-ARCH-VERBS", Dimension::Trend).unwrap(),
    std::path::Path::new("/evals/I-FUNC-ARCH-VERBS_trend.json"),
  );
  assert_ne!(
    store.path_for("a_trend", Dimension::Maturity).unwrap(),
    store.path_for("a", Dimension::Trend).unwrap(),
  );
}

#[test]
fn assessment_path_rejects_escaping_ids() {
  let store = FsAssessmentStore::new("/evals");
  for id in ["", "..", "../repo", "a/b"] {
    assert!(store.path_for(id, Dimension::Trend).is_err(), "{id:?} accepted");
  }
}

#[test]
fn assessment_absent_loads_as_none() {
  let dir = tmp();
  let store = FsAssessmentStore::new(dir.path());
  assert!(store.load("I-001", Dimension::Maturity).unwrap().is_none());
}

#[test]
fn assessment_save_then_load() {
  let dir = tmp();
  let store = FsAssessmentStore::new(dir.path().join("evaluations"));
  let saved = store.save_text("I-001", Dimension::Trend, TREND).unwrap();

  let loaded = store.load("I-001", Dimension::Trend).unwrap().unwrap();
  assert_eq!(loaded, saved);
  assert_eq!(loaded.suggestions(), ["emerging"]);
  assert_eq!(store.list_for("I-001").unwrap(), [Dimension::Trend]);
}

#[test]
fn assessment_save_overwrites_wholesale() {
  let dir = tmp();
  let store = FsAssessmentStore::new(dir.path());
  store.save_text("I-001", Dimension::Trend, TREND).unwrap();
  store.save_text("I-001", Dimension::Trend, r#"{"trend_score": 2}"#).unwrap();

  let loaded = store.load("I-001", Dimension::Trend).unwrap().unwrap();
  assert_eq!(loaded.score().get(), 2);
  assert!(loaded.justification().is_empty());
  assert!(loaded.suggestions().is_empty());
}

#[test]
fn invalid_assessment_save_keeps_previous_document() {
  let dir = tmp();
  let store = FsAssessmentStore::new(dir.path());
  store.save_text("I-001", Dimension::Trend, TREND).unwrap();
  let path = store.path_for("I-001", Dimension::Trend).unwrap();
  let before = fs::read_to_string(&path).unwrap();

  let err = store
    .save_text("I-001", Dimension::Trend, r#"{"justification": "no score"}"#)
    .unwrap_err();
  assert!(matches!(err, Error::Core(forge_core::Error::MissingField("trend_score"))));

  let err = store.save_text("I-001", Dimension::Trend, "{\"trend_score\": ").unwrap_err();
  assert!(matches!(err, Error::Core(forge_core::Error::Malformed { .. })));

  assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn save_rejects_document_for_other_dimension() {
  let dir = tmp();
  let store = FsAssessmentStore::new(dir.path());
  let doc = forge_core::assessment::AssessmentDocument::parse(Dimension::Trend, TREND).unwrap();

  let err = store.save("I-001", Dimension::Maturity, &doc).unwrap_err();
  assert!(matches!(err, Error::Core(forge_core::Error::DimensionMismatch { .. })));
  assert!(store.list_for("I-001").unwrap().is_empty());
}

#[test]
fn malformed_assessment_on_disk_is_an_error() {
  let dir = tmp();
  let store = FsAssessmentStore::new(dir.path());
  let path = store.path_for("I-001", Dimension::Maturity).unwrap();
  fs::write(&path, r#"{"justification": "score went missing"}"#).unwrap();

  let err = store.load("I-001", Dimension::Maturity).unwrap_err();
  assert!(matches!(err, Error::MalformedAssessment { .. }));
}

#[test]
fn overlay_reads_assessments_from_disk() {
  let dir = tmp();
  let store = FsAssessmentStore::new(dir.path());
  let repo = sample_repo();
  let idea = repo.find("I-FUNC-ARCH-VERBS").unwrap();

  assert_eq!(resolve_scores(idea, &store).trend.score.get(), 3);

  store.save_text(&idea.idea_id, Dimension::Trend, TREND).unwrap();
  let overlay = resolve_scores(idea, &store);
  assert_eq!(overlay.trend.score.get(), 8);
  assert_eq!(overlay.trend.source, ScoreSource::Assessment);

  fs::remove_file(store.path_for(&idea.idea_id, Dimension::Trend).unwrap()).unwrap();
  assert_eq!(resolve_scores(idea, &store).trend.score.get(), 3);
}
