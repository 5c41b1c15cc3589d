//! `forge` — command-line front end for the Forge idea repository.
//!
//! # Usage
//!
//! ```text
//! forge list
//! forge show I-FUNC-ARCH-VERBS
//! forge new --title "Functional verbs" --tags "architecture, naming"
//! forge edit I-FUNC-ARCH-VERBS --trend 6 --related refs.json
//! forge sources I-FUNC-ARCH-VERBS
//! forge assessment save I-FUNC-ARCH-VERBS trend < trend.json
//! ```

mod app;
mod settings;

use std::{
  io::{self, Read as _},
  path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, bail};
use app::App;
use clap::{Args, Parser, Subcommand};
use forge_core::{
  assessment::{AssessmentSource as _, Dimension},
  draft::IdeaDraft,
  idea::Idea,
  overlay::{EffectiveScore, ScoreSource},
  provenance,
  repository::SaveOutcome,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "forge", version, about = "Manage the idea repository")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "forge.toml", env = "FORGE_CONFIG")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every idea.
  List,
  /// Show an idea with its latest assessments overlaid on the stored scores.
  Show { idea_id: String },
  /// Create an idea. Without `--id`, a time-based identifier is generated.
  New {
    #[arg(long)]
    id:     Option<String>,
    #[command(flatten)]
    fields: IdeaFields,
  },
  /// Edit an idea. Unspecified scores keep their overlaid values, so saving
  /// commits any assessment scores currently shown.
  Edit {
    idea_id: String,
    /// Rename the idea.
    #[arg(long)]
    new_id:  Option<String>,
    #[command(flatten)]
    fields:  IdeaFields,
  },
  /// Delete an idea.
  Delete {
    idea_id: String,
    /// Confirm the deletion.
    #[arg(long)]
    yes:     bool,
  },
  /// Print the source dossier for an idea.
  Sources { idea_id: String },
  /// Print the narrative log for a week.
  Narrative { week: String },
  /// View or upload assessments.
  #[command(subcommand)]
  Assessment(AssessmentCommand),
}

#[derive(Subcommand, Debug)]
enum AssessmentCommand {
  /// List the dimensions assessed for an idea.
  List { idea_id: String },
  /// Print the stored assessment for an idea and dimension.
  Show { idea_id: String, dimension: Dimension },
  /// Validate and store an assessment, replacing any existing one.
  Save {
    idea_id:   String,
    dimension: Dimension,
    /// Document to read; stdin when omitted or `-`.
    file:      Option<PathBuf>,
  },
}

/// Field overrides shared by `new` and `edit`.
#[derive(Args, Debug)]
struct IdeaFields {
  #[arg(long)]
  title:       Option<String>,
  #[arg(long)]
  description: Option<String>,
  /// Comma-separated tags; replaces the existing tags.
  #[arg(long)]
  tags:        Option<String>,
  #[arg(long)]
  maturity:    Option<i64>,
  #[arg(long)]
  interest:    Option<i64>,
  #[arg(long)]
  trend:       Option<i64>,
  /// JSON array of `{week, item_id, section}` references (`-` for stdin).
  #[arg(long, value_name = "FILE")]
  related:     Option<PathBuf>,
}

impl IdeaFields {
  fn apply(self, draft: &mut IdeaDraft) -> Result<()> {
    if let Some(title) = self.title {
      draft.title = title;
    }
    if let Some(description) = self.description {
      draft.description = description;
    }
    if let Some(tags) = self.tags {
      draft.tags = tags;
    }
    if let Some(score) = self.maturity {
      draft.maturity_score = score;
    }
    if let Some(score) = self.interest {
      draft.personal_interest_score = score;
    }
    if let Some(score) = self.trend {
      draft.trend_score = score;
    }
    if let Some(path) = self.related {
      draft.related_items = read_input(Some(&path))?;
    }
    Ok(())
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = settings::Settings::load(&cli.config)?;
  tracing::debug!(?settings, "loaded configuration");
  let mut app = App::open(&settings);

  match cli.command {
    Command::List => {
      let repo = app.repository()?;
      for idea in repo.ideas() {
        println!("{}: {}", idea.idea_id, idea.title);
      }
      eprintln!("{} ideas", repo.len());
    }
    Command::Show { idea_id } => {
      let selection = app.select(&idea_id)?;
      let assessed = app.assessments.list_for(&idea_id)?;
      print_idea(&selection.working, &selection.overlay, &assessed);
    }
    Command::New { id, fields } => {
      let id = id.unwrap_or_else(|| Idea::generate_id(&chrono::Local::now()));
      let mut draft = IdeaDraft::from_idea(&Idea::new(id, ""))?;
      fields.apply(&mut draft)?;
      let (outcome, idea_id) = app.save(None, draft)?;
      report_save(outcome, &idea_id);
    }
    Command::Edit { idea_id, new_id, fields } => {
      let selection = app.select(&idea_id)?;
      let mut draft = IdeaDraft::from_idea(&selection.working)?;
      if let Some(new_id) = new_id {
        draft.idea_id = new_id;
      }
      fields.apply(&mut draft)?;
      let (outcome, idea_id) = app.save(Some(selection.previous_id.as_str()), draft)?;
      report_save(outcome, &idea_id);
    }
    Command::Delete { idea_id, yes } => {
      if !yes {
        bail!("refusing to delete {idea_id} without --yes");
      }
      match app.delete(&idea_id)? {
        Some(_) => println!("Deleted idea: {idea_id}"),
        None => println!("No idea with id {idea_id}; nothing deleted"),
      }
    }
    Command::Sources { idea_id } => {
      let archives = app.load_archives();
      let idea = app.find(&idea_id)?;
      print!("{}", provenance::resolve(idea, &archives.index));
    }
    Command::Narrative { week } => {
      let archives = app.load_archives();
      match archives.index.get(&week).and_then(|w| w.narrative.as_deref()) {
        Some(text) => println!("{text}"),
        None => bail!("no narrative log for week {week}"),
      }
    }
    Command::Assessment(cmd) => run_assessment(&mut app, cmd)?,
  }

  Ok(())
}

fn run_assessment(app: &mut App, cmd: AssessmentCommand) -> Result<()> {
  match cmd {
    AssessmentCommand::List { idea_id } => {
      app.find(&idea_id)?;
      for dimension in app.assessments.list_for(&idea_id)? {
        println!("{dimension}");
      }
    }
    AssessmentCommand::Show { idea_id, dimension } => {
      match app.assessments.load(&idea_id, dimension)? {
        Some(doc) => println!("{}", serde_json::to_string_pretty(&doc)?),
        None => bail!("no {dimension} assessment for {idea_id}"),
      }
    }
    AssessmentCommand::Save { idea_id, dimension, file } => {
      app.find(&idea_id)?;
      let text = read_input(file.as_deref())?;
      let doc = app
        .assessments
        .save_text(&idea_id, dimension, &text)
        .with_context(|| format!("saving {dimension} assessment for {idea_id}"))?;
      println!(
        "Saved {dimension} assessment for {idea_id} ({} {}); `forge edit {idea_id}` commits it",
        dimension.score_field(),
        doc.score()
      );
    }
  }
  Ok(())
}

// ─── Output ───────────────────────────────────────────────────────────────────

fn print_idea<E>(
  idea: &Idea,
  overlay: &forge_core::overlay::ScoreOverlay<E>,
  assessed: &[Dimension],
) {
  println!("{}: {}", idea.idea_id, idea.title);
  if !idea.description.is_empty() {
    println!("  {}", idea.description);
  }
  println!("  maturity:    {}", effective(overlay.maturity));
  println!("  interest:    {}", overlay.personal_interest);
  println!("  trend:       {}", effective(overlay.trend));
  println!("  tags:        {}", idea.tags);
  println!("  references:  {}", idea.related_items.len());
  let assessed: Vec<String> = assessed.iter().map(ToString::to_string).collect();
  println!("  assessments: {}", assessed.join(", "));
}

fn effective(score: EffectiveScore) -> String {
  match score.source {
    ScoreSource::Stored => score.score.to_string(),
    ScoreSource::Assessment => format!("{} (from assessment)", score.score),
  }
}

fn report_save(outcome: SaveOutcome, idea_id: &str) {
  match outcome {
    SaveOutcome::Updated(_) => println!("Updated idea: {idea_id}"),
    SaveOutcome::Added(_) => println!("Added new idea: {idea_id}"),
  }
}

/// Read `path`, or stdin for `None` and `-`.
fn read_input(path: Option<&Path>) -> Result<String> {
  match path {
    Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
      .with_context(|| format!("reading {}", path.display())),
    _ => {
      let mut text = String::new();
      io::stdin().read_to_string(&mut text).context("reading stdin")?;
      Ok(text)
    }
  }
}
