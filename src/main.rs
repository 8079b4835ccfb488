//! slidecast CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use slidecast::cli::Args;
use slidecast::config::ApiConfig;
use slidecast::imagegen::create_backend;
use slidecast::inventory::InventoryTracker;
use slidecast::pool::AccountPool;
use slidecast::producer::{ImageProducer, load_prompts};

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.init_config {
        let path = args.config.clone().unwrap_or_else(ApiConfig::default_path);
        ApiConfig::write_example(&path)
            .with_context(|| format!("Failed to write example config to {}", path.display()))?;
        println!("Example config written to: {}", path.display());
        println!("Fill in your API keys, then run with --status to verify.");
        return Ok(());
    }

    // Inventory commands work without any API accounts configured.
    let mut tracker = InventoryTracker::open(&args.projects_dir);

    if args.scan {
        tracker.scan_all_projects();
        println!("{}", tracker.dashboard());
        return Ok(());
    }

    if let Some(name) = &args.project {
        let project_dir = args.projects_dir.join(name);
        let project = tracker.scan_project(name, &project_dir);

        println!("Scanned project: {}", project.name);
        println!(
            "  Stage: {:?} ({}%)",
            project.current_stage, project.completion_percent
        );
        println!(
            "  Prompts: {}/{}  Images: {}/{}  Audio: {}/{}",
            project.prompts_generated,
            project.total_slides,
            project.images_ready,
            project.total_slides,
            project.audio_ready,
            project.total_slides
        );
        if let Some(action) = project.next_action() {
            println!("  Next: {action}");
        }
        return Ok(());
    }

    if args.dashboard {
        println!("{}", tracker.dashboard());
        return Ok(());
    }

    if let Some(stage) = args.pending {
        let pending = tracker.pending_work(stage);
        if pending.is_empty() {
            println!("No pending work at that stage.");
        } else {
            println!("{} project(s) with pending work:", pending.len());
            for project in pending {
                println!(
                    "  {} ({}%)",
                    project.name, project.completion_percent
                );
            }
        }
        return Ok(());
    }

    // Everything below talks to the API account pool.
    if !args.status && args.check_capacity.is_none() && args.generate.is_none() {
        eprintln!("No action specified. Use --scan, --dashboard, --status, or --generate.");
        eprintln!("Run with --help for usage information.");
        return Ok(());
    }

    let config = ApiConfig::discover(args.config.as_deref())?;
    let mut pool = AccountPool::new(&config.accounts, args.state_path());

    if args.status {
        println!("{}", pool.status_summary());
        return Ok(());
    }

    if let Some(required) = args.check_capacity {
        let check = pool.check_capacity(required);
        println!("Required:  {}", check.required);
        println!("Available: {}", check.available);
        if check.sufficient {
            println!("Sufficient capacity.");
        } else {
            println!("Insufficient capacity: short by {}.", check.shortfall);
        }
        return Ok(());
    }

    if let Some(name) = &args.generate {
        return generate_images(&mut pool, &mut tracker, name, &args);
    }

    Ok(())
}

fn generate_images(
    pool: &mut AccountPool,
    tracker: &mut InventoryTracker,
    name: &str,
    args: &Args,
) -> Result<()> {
    let project_dir = args.projects_dir.join(name);
    let prompts = load_prompts(&project_dir.join("image_prompts"))
        .with_context(|| format!("Failed to read prompts for project '{name}'"))?;

    if prompts.is_empty() {
        println!("No prompts found for '{name}'. Generate prompts first.");
        return Ok(());
    }

    let check = pool.check_capacity(prompts.len() as u32);
    if !check.sufficient {
        println!(
            "Warning: {} prompt(s) but only {} request(s) of quota remain.",
            check.required, check.available
        );
        println!("Slides past the quota will get placeholder images.");
    }

    let backend = create_backend(&args.api_url);
    let producer = ImageProducer::new(backend, project_dir.join("images"));
    let report = producer.produce(pool, &prompts);

    println!("Image generation for '{name}':");
    println!("  Generated:    {}", report.generated);
    println!("  Reused:       {}", report.reused);
    println!("  Placeholders: {}", report.placeholders);
    if report.failures > 0 {
        println!("  Failures:     {}", report.failures);
    }

    let project = tracker.scan_project(name, &project_dir);
    if let Some(action) = project.next_action() {
        println!("Next: {action}");
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "slidecast=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
