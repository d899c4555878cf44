use anyhow::{Context, Result};
use conduit_lib::Config;
use reqwest::Client;
use std::path::{Path, PathBuf};

use crate::fs_utils::{EntryFilter, encode_size};
use crate::packaging::zip::{Compressor, build_archive};
use crate::packaging::{ListingSink, archive_tree};
use crate::sink::HttpReply;
use crate::sink::send_net::{check_endpoint, upload_archive};

/// Archiving and uploading share one thread; nothing overlaps.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all() // Enables both IO and time drivers
        .build()
        .context("starting async runtime")
}

pub fn package_and_upload_within_tokio(config: &Config) -> Result<()> {
    runtime()?.block_on(package_and_upload(config, &Client::new()))?;
    Ok(())
}

pub fn check_within_tokio(config: &Config) -> Result<()> {
    runtime()?.block_on(check(config, &Client::new()))?;
    Ok(())
}

async fn check(config: &Config, client: &Client) -> Result<HttpReply> {
    let url = config.check_url();
    let reply = check_endpoint(client, url)
        .await
        .with_context(|| format!("checking {url}"))?;
    print_reply(&reply);
    Ok(reply)
}

fn root_dir(config: &Config) -> Result<PathBuf> {
    match &config.root {
        Some(root) => Ok(PathBuf::from(root)),
        None => std::env::current_dir().context("resolving working directory"),
    }
}

fn compressor(config: &Config) -> Compressor {
    if config.is_compressed() {
        Compressor::Deflate
    } else {
        Compressor::Stored
    }
}

/// Archive then upload. Dry runs only list, and return no reply.
async fn package_and_upload(config: &Config, client: &Client) -> Result<Option<HttpReply>> {
    let root = root_dir(config)?;
    let filter = EntryFilter::new(config.skip_patterns())?;

    if config.is_dry() {
        dry_run(&root, &filter).await?;
        return Ok(None);
    }

    let archive = Path::new(config.archive());
    let report = build_archive(&root, archive, compressor(config), &filter)
        .await
        .with_context(|| format!("packaging {}", root.display()))?;

    // Each skipped path was already logged by the traversal.
    println!(
        "Packaged {} files ({}, {} skipped) into {}",
        report.entries,
        encode_size(report.bytes),
        report.warnings.len(),
        archive.display()
    );

    let reply = upload_archive(client, config.upload_url(), archive)
        .await
        .with_context(|| format!("uploading {}", archive.display()))?;
    print_reply(&reply);

    Ok(Some(reply))
}

/// List what would be archived without writing or uploading anything.
async fn dry_run(root: &Path, filter: &EntryFilter) -> Result<()> {
    let mut sink = ListingSink::default();
    let report = archive_tree(root, &mut sink, filter)
        .await
        .with_context(|| format!("listing {}", root.display()))?;

    println!("--- DRY RUN ---");
    for (name, size) in &sink.entries {
        println!("  {name} ({})", encode_size(*size));
    }
    println!("Total files: {}", report.entries);
    println!("Skipped: {}", report.warnings.len());
    println!("Total size: {}", encode_size(report.bytes));
    Ok(())
}

fn print_reply(reply: &HttpReply) {
    println!("{}", reply.status);
    println!("{}", reply.body);
}
