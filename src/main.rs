use chrono::Local;
use clap::{Parser, Subcommand};
use drillgen::config::{Config, ConfigStore, FileConfigStore};
use drillgen::grading::{self, Outcome};
use drillgen::progress::{compare_to_average, ProgressStore};
use drillgen::render::{self, ShownExercise};
use drillgen::{
    BlankPosition, Difficulty, ExerciseId, ExerciseKind, GenerationIndex, RuntimeSettings,
};
use itertools::Itertools;
use log::debug;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use time_humanize::{Accuracy, HumanTime, Tense};

/// practise English with an endless, repeatable stream of exercises
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Vocabulary, sentence, reading, listening and word-puzzle drills. \
Hand-written exercises come first; after that they are mixed with template-generated \
ones that are identical every time you return to the same index."
)]
pub struct Cli {
    /// difficulty tier: basic, intermediate or medium
    #[clap(short = 'd', long, global = true, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// print machine-readable JSON
    #[clap(long, global = true)]
    json: bool,

    /// which word generated sentences blank out
    #[clap(long, global = true, value_enum)]
    blank_position: Option<BlankPosition>,

    /// replay a curated exercise every N items once the curated bank is used up
    #[clap(long, global = true)]
    replay_period: Option<u64>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// show an exercise (defaults to the current position)
    Show {
        #[clap(value_parser = parse_kind)]
        kind: ExerciseKind,
        #[clap(short, long, allow_negative_numbers = true, value_parser = parse_index)]
        index: Option<GenerationIndex>,
    },
    /// advance to the next exercise and show it
    Next {
        #[clap(value_parser = parse_kind)]
        kind: ExerciseKind,
    },
    /// go back to the previous exercise and show it
    Prev {
        #[clap(value_parser = parse_kind)]
        kind: ExerciseKind,
    },
    /// mark an exercise as completed
    Complete {
        #[clap(value_parser = parse_kind)]
        kind: ExerciseKind,
        #[clap(short, long, allow_negative_numbers = true, value_parser = parse_index)]
        index: Option<GenerationIndex>,
    },
    /// clear a completion so the exercise can be done again
    Retake {
        #[clap(value_parser = parse_kind)]
        kind: ExerciseKind,
        #[clap(short, long, allow_negative_numbers = true, value_parser = parse_index)]
        index: Option<GenerationIndex>,
    },
    /// grade an answer; a correct answer completes the exercise
    Check {
        #[clap(value_parser = parse_kind)]
        kind: ExerciseKind,
        #[clap(short, long, allow_negative_numbers = true, value_parser = parse_index)]
        index: Option<GenerationIndex>,
        #[clap(short, long)]
        answer: String,
    },
    /// completions, today's activity and streaks
    Stats {
        /// number of recent completions to list
        #[clap(long, default_value_t = 5)]
        recent: usize,
    },
    /// print the effective settings
    Config {
        /// persist the current flags as defaults
        #[clap(long)]
        save: bool,
    },
}

fn parse_difficulty(s: &str) -> drillgen::Result<Difficulty> {
    s.parse()
}

fn parse_kind(s: &str) -> drillgen::Result<ExerciseKind> {
    s.parse()
}

fn parse_index(s: &str) -> drillgen::Result<GenerationIndex> {
    s.parse()
}

impl Cli {
    fn runtime_settings(&self, cfg: &Config) -> RuntimeSettings {
        let mut rs = RuntimeSettings::from(cfg);
        if let Some(d) = self.difficulty {
            rs.difficulty = d;
        }
        if let Some(b) = self.blank_position {
            rs.blank_position = b;
        }
        if let Some(p) = self.replay_period {
            rs.replay_period = p;
        }
        rs.json_output |= self.json;
        rs
    }
}

struct App {
    settings: RuntimeSettings,
    store: ProgressStore,
}

impl App {
    fn resolve(
        &self,
        kind: ExerciseKind,
        index: Option<GenerationIndex>,
    ) -> drillgen::Result<ExerciseId> {
        let index = match index {
            Some(i) => i,
            None => self.store.cursor(kind, self.settings.difficulty)?,
        };
        Ok(ExerciseId::new(kind, self.settings.difficulty, index))
    }

    fn show(&self, id: &ExerciseId) -> drillgen::Result<()> {
        let served = self
            .settings
            .generator()
            .record(id.kind, id.difficulty, id.index.get());
        let completed = self.store.is_completed(id)?;
        if self.settings.json_output {
            let shown = ShownExercise {
                id: id.to_string(),
                completed,
                exercise: &served,
            };
            println!("{}", serde_json::to_string_pretty(&shown)?);
        } else {
            println!("{}\n", render::header(id, &served, completed));
            print!("{}", render::render_record(&served.item));
        }
        Ok(())
    }

    fn move_to(
        &self,
        kind: ExerciseKind,
        step: fn(GenerationIndex) -> GenerationIndex,
    ) -> drillgen::Result<()> {
        let current = self.store.cursor(kind, self.settings.difficulty)?;
        let target = step(current);
        self.store.set_cursor(kind, self.settings.difficulty, target)?;
        debug!("{kind}/{} cursor {current} -> {target}", self.settings.difficulty);
        self.show(&ExerciseId::new(kind, self.settings.difficulty, target))
    }

    fn report(&self, id: &ExerciseId, status: &str) {
        if self.settings.json_output {
            println!("{}", json!({ "id": id.to_string(), "status": status }));
        } else {
            println!("{id}: {status}");
        }
    }

    fn check(&mut self, id: &ExerciseId, answer: &str) -> drillgen::Result<()> {
        let served = self
            .settings
            .generator()
            .record(id.kind, id.difficulty, id.index.get());
        let grade = grading::grade(&served.item, answer)?;
        if grade.outcome == Outcome::Correct {
            self.store.mark_complete(id)?;
        }
        if self.settings.json_output {
            let value = json!({
                "id": id.to_string(),
                "outcome": grade.outcome,
                "expected": grade.expected,
            });
            println!("{value}");
        } else if grade.outcome == Outcome::Correct {
            println!("{id}: correct");
        } else {
            println!("{id}: incorrect (expected: {})", grade.expected);
        }
        Ok(())
    }

    fn stats(&self, recent: usize) -> drillgen::Result<()> {
        let today = Local::now().date_naive();
        let streak = self.store.streak(today)?;
        let todays = self.store.daily_counts(today)?;
        let averages = self.store.averages()?;
        let history = self.store.history(recent)?;
        let mut completed = Vec::new();
        for kind in ExerciseKind::ALL {
            completed.push((kind, self.store.completed_ids(kind)?.len()));
        }
        let today_count =
            |kind: ExerciseKind| todays.iter().find(|(k, _)| *k == kind).map_or(0, |(_, n)| *n);

        if self.settings.json_output {
            let trends: BTreeMap<String, _> = averages
                .kinds
                .iter()
                .map(|k| (k.kind.to_string(), compare_to_average(today_count(k.kind), k.per_day)))
                .collect();
            let value = json!({
                "completed": completed
                    .iter()
                    .map(|(k, n)| (k.to_string(), *n))
                    .collect::<BTreeMap<_, _>>(),
                "today": todays
                    .iter()
                    .map(|(k, n)| (k.to_string(), *n))
                    .collect::<BTreeMap<_, _>>(),
                "averages": averages,
                "trends": trends,
                "streak": streak,
                "recent": history,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        println!("Completed");
        for (kind, n) in &completed {
            println!("  {:<11} {n}", kind.to_string());
        }
        let today_total: u32 = todays.iter().map(|(_, n)| n).sum();
        println!(
            "Today: {today_total} ({})",
            todays.iter().map(|(k, n)| format!("{k} {n}")).join(", ")
        );
        if averages.active_days > 0 {
            println!("Daily average over {} day(s)", averages.active_days);
            for k in &averages.kinds {
                let trend = compare_to_average(today_count(k.kind), k.per_day)
                    .map(|t| format!("  today {t}"))
                    .unwrap_or_default();
                println!("  {:<11} {:.1}{trend}", k.kind.to_string(), k.per_day);
            }
        }
        println!("Streak: {} day(s), best {}", streak.current, streak.best);
        if !history.is_empty() {
            println!("Recent");
            let now = Local::now();
            for c in &history {
                let elapsed = (now - c.completed_at).to_std().unwrap_or(Duration::ZERO);
                let ago = HumanTime::from(elapsed).to_text_en(Accuracy::Rough, Tense::Past);
                println!("  {}  {ago}", c.id);
            }
        }
        Ok(())
    }
}

fn run(cli: Cli) -> drillgen::Result<()> {
    let config_store = FileConfigStore::new();
    let settings = cli.runtime_settings(&config_store.load());

    if let Command::Config { save } = &cli.command {
        let cfg = Config::from(&settings);
        if *save {
            config_store.save(&cfg)?;
            eprintln!("saved {}", config_store.path().display());
        }
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    let mut app = App {
        settings,
        store: ProgressStore::open_default()?,
    };

    match cli.command {
        Command::Show { kind, index } => {
            let id = app.resolve(kind, index)?;
            if index.is_some() {
                app.store.set_cursor(kind, id.difficulty, id.index)?;
            }
            app.show(&id)
        }
        Command::Next { kind } => app.move_to(kind, GenerationIndex::next),
        Command::Prev { kind } => app.move_to(kind, GenerationIndex::prev),
        Command::Complete { kind, index } => {
            let id = app.resolve(kind, index)?;
            let status = if app.store.mark_complete(&id)? {
                "completed"
            } else {
                "already completed"
            };
            app.report(&id, status);
            Ok(())
        }
        Command::Retake { kind, index } => {
            let id = app.resolve(kind, index)?;
            let status = if app.store.retake(&id)? {
                "ready to retake"
            } else {
                "not completed"
            };
            app.report(&id, status);
            Ok(())
        }
        Command::Check { kind, index, answer } => {
            let id = app.resolve(kind, index)?;
            app.check(&id, &answer)
        }
        Command::Stats { recent } => app.stats(recent),
        Command::Config { .. } => Ok(()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
