// src/main.rs

mod cli;

use anyhow::Context;
use chrono::TimeZone;
use clap::Parser;
use cli::Args;
use git_tikz::fixture::Fixture;
use git_tikz::renderer::TikzRenderer;
use git_tikz::source::{FixtureSource, GitSource, LogSource};
use git_tikz::{export_layout, Branch, BranchLoader, LineParser, Repository};
use std::io::{Read, Write};
use std::time::Instant;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let source = log_source(args)?;
    let parser = LineParser::new(args.grammar());
    log::debug!("Parsing log lines as {:?}.", parser.grammar());
    let loader = BranchLoader::new(source.as_ref(), parser, args.load_options());

    let mut repo = Repository::new();
    for name in args.branches_to_load() {
        repo.add_branch(Branch::new(name.as_str()));
    }
    repo.load_all(&loader)?;

    log::info!(
        "Loaded {} commits on {} branches in {:.2?}.",
        repo.commit_count(),
        repo.branches().count(),
        start_time.elapsed()
    );
    if let Some((first, last)) = repo.time_span() {
        if let (Some(first), Some(last)) = (
            chrono::Utc.timestamp_opt(first, 0).single(),
            chrono::Utc.timestamp_opt(last, 0).single(),
        ) {
            log::info!("History spans from {} to {}.", first.to_rfc2822(), last.to_rfc2822());
        }
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    if args.make_test {
        repo.to_fixture().write_to(&mut out)?;
    } else {
        let renderer = match &args.template {
            Some(path) => {
                let template = std::fs::read_to_string(path)
                    .with_context(|| format!("reading template {}", path.display()))?;
                TikzRenderer::with_template(&template)?
            }
            None => TikzRenderer::new()?,
        };
        let layout = export_layout(&repo, &args.layout_options())?;
        out.write_all(renderer.render(&layout)?.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

fn log_source(args: &Args) -> anyhow::Result<Box<dyn LogSource>> {
    if let Some(path) = &args.replay {
        let file = std::fs::File::open(path).with_context(|| format!("opening fixture {}", path.display()))?;
        let fixture = Fixture::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("reading fixture {}", path.display()))?;
        let missing = args.missing_from(&fixture);
        if !missing.is_empty() {
            anyhow::bail!(
                "fixture {} has no lines for {} (it holds: {})",
                path.display(),
                missing.join(", "),
                fixture.branch_names().collect::<Vec<_>>().join(", ")
            );
        }
        return Ok(Box::new(FixtureSource::new(fixture)));
    }
    if args.stdin {
        let branch = args.branches.first().map_or("master", String::as_str);
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(Box::new(FixtureSource::new(Fixture::single(branch, text))));
    }
    Ok(Box::new(GitSource::new(&args.repo)))
}
