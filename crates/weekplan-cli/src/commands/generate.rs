//! Weekly schedule generation.

use std::collections::HashMap;

use chrono::NaiveDate;
use clap::Args;
use weekplan_core::timeline::clock::format_clock;
use weekplan_core::{
    Config, CoreError, GeneratedBlock, GenerationMode, ScheduleDb, ScheduleGenerator, SeededRandom,
    WeekPlan,
};

use super::parse_date;

#[derive(Args)]
pub struct GenerateArgs {
    /// User ID
    pub user: String,
    /// Any date inside the week to plan (YYYY-MM-DD, default today)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,
    /// Seed for reproducible output (overrides scheduler.seed)
    #[arg(long)]
    pub seed: Option<u64>,
    /// What to do with blocks already stored for the week: append or replace
    #[arg(long)]
    pub mode: Option<GenerationMode>,
    /// Compute and print the plan without storing it
    #[arg(long)]
    pub dry_run: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut scheduler_config = config.scheduler_config()?;
    if let Some(mode) = args.mode {
        scheduler_config.mode = mode;
    }
    let generator = ScheduleGenerator::with_config(scheduler_config);
    let mut rng = SeededRandom::new(args.seed.or(config.scheduler.seed));
    let start = args
        .start
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let db = ScheduleDb::open()?;

    if args.dry_run {
        let profile = db
            .get_profile(&args.user)?
            .ok_or_else(|| CoreError::MissingProfile {
                user_id: args.user.clone(),
            })?;
        let activities = db.list_activities()?;
        let fixed_blocks = db.list_fixed_blocks(&args.user)?;
        let plan = generator.plan_week(&profile, &activities, &fixed_blocks, start, &mut rng)?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            print_plan(&plan);
        }
        return Ok(());
    }

    match generator.generate_schedule(&args.user, start, &db, &mut rng) {
        Ok(blocks) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&blocks)?);
            } else {
                let names = activity_names(&db)?;
                print_blocks(&blocks, &names);
                println!(
                    "{} blocks stored ({})",
                    blocks.len(),
                    generator.config().mode
                );
            }
            Ok(())
        }
        Err(CoreError::Persistence { blocks, source }) => {
            // Hand the computed schedule back so it is not lost
            println!("{}", serde_json::to_string_pretty(&blocks)?);
            Err(CoreError::Persistence { blocks, source }.into())
        }
        Err(e) => Err(e.into()),
    }
}

fn activity_names(db: &ScheduleDb) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    Ok(db
        .list_activities()?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect())
}

fn print_plan(plan: &WeekPlan) {
    println!(
        "Plan for {} ({} to {})",
        plan.user_id,
        plan.start_date,
        plan.end_date()
    );
    for day in &plan.days {
        println!(
            "{} {}: {} placed, {} min scheduled, {} of {} free min unfilled",
            day.date,
            day.day_of_week,
            day.placements.len(),
            day.scheduled_minutes(),
            day.unfilled_minutes(),
            day.free_minutes()
        );
        for p in &day.placements {
            println!(
                "  {:02}:{:02}-{:02}:{:02}  {}",
                p.start / 60,
                p.start % 60,
                p.end / 60,
                p.end % 60,
                p.activity.name
            );
        }
    }
}

fn print_blocks(blocks: &[GeneratedBlock], names: &HashMap<String, String>) {
    let mut current: Option<NaiveDate> = None;
    for block in blocks {
        if current != Some(block.date) {
            println!("{} {}", block.date, block.date.format("%A"));
            current = Some(block.date);
        }
        let name = names
            .get(&block.activity_id)
            .map_or(block.activity_id.as_str(), String::as_str);
        println!(
            "  {}-{}  {}",
            format_clock(block.start_time),
            format_clock(block.end_time),
            name
        );
    }
}
