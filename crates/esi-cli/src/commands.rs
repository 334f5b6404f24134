use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};
use comfy_table::Table;
use tracing::info;

use esi_cli::render::{RenderOptions, RenderOutcome, render};
use esi_cli::settings::Settings;
use esi_cli::uploads::{CleanReport, clean_stale, fresh_session};
use esi_export::{DoiTarget, DownloadTarget, ReportRoutes};
use esi_model::{SessionId, pdb};

use crate::cli::{CleanArgs, LinksArgs, PdbArgs, RenderArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_render(args: &RenderArgs, settings: &Settings) -> Result<RenderOutcome> {
    let session = args
        .session
        .unwrap_or_else(|| fresh_session(&settings.uploads.dir));
    let options = RenderOptions {
        reports: args.reports.clone(),
        structures: args.structures.clone(),
        output: args.output.clone(),
        session,
        images: args.images,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    runtime.block_on(render(&options, settings))
}

pub fn run_links(args: &LinksArgs, settings: &Settings) -> Result<()> {
    let routes = ReportRoutes::new(&settings.export.base_url, &args.session)
        .context("build report routes")?;
    let template = args
        .template
        .as_deref()
        .unwrap_or(&settings.report.template);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Export"), header_cell("Locator")]);
    apply_table_style(&mut table);
    table.add_row(vec!["Page".to_string(), routes.page().to_string()]);
    for target in DownloadTarget::ALL {
        let url = routes.download(target, Some(template))?;
        table.add_row(vec![target.label().to_string(), url.to_string()]);
    }
    for target in settings.export.doi.enabled() {
        let url = routes.doi(target, Some(template))?;
        table.add_row(vec![doi_label(target), url.to_string()]);
    }
    println!("{table}");
    Ok(())
}

fn doi_label(target: DoiTarget) -> String {
    format!("DOI: {}", target.label())
}

pub fn run_pdb(args: &PdbArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.structure)
        .with_context(|| format!("read structure {}", args.structure.display()))?;
    let structure = pdb::parse(&text)
        .with_context(|| format!("parse structure {}", args.structure.display()))?;
    info!(atoms = structure.len(), "Parsed structure");

    print!("{}", structure.pdb_block());
    println!();
    println!("{}", structure.xyz_block());
    Ok(())
}

pub fn run_clean(args: &CleanArgs, settings: &Settings) -> Result<CleanReport> {
    let uploads = args
        .uploads
        .clone()
        .unwrap_or_else(|| settings.uploads.dir.clone());
    let hours = args.max_age_hours.unwrap_or(settings.uploads.max_age_hours);
    let max_age = i64::try_from(hours)
        .ok()
        .and_then(TimeDelta::try_hours)
        .unwrap_or(TimeDelta::MAX);

    clean_stale(&uploads, max_age, Utc::now())
        .with_context(|| format!("clean uploads in {}", uploads.display()))
}

pub fn run_session(settings: &Settings) -> SessionId {
    fresh_session(&settings.uploads.dir)
}
