use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use linkhub::{Hub, HubConfig, MemoryStore, PendingRequest, RequestOutcome};

#[derive(Parser)]
#[command(name = "linkhub")]
#[command(about = "Browse projects and their links against an in-memory store")]
struct Cli {
    /// JSON file with projects and links to create at startup
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// JSON session config (defaults come from LINKHUB_* variables)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project to select by name
    #[arg(long, value_name = "NAME")]
    select: Option<String>,

    /// Project to delete, with its links, by name
    #[arg(long, value_name = "NAME")]
    delete: Option<String>,

    /// Search projects and links
    #[arg(short, long)]
    query: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Deserialize)]
struct SeedProject {
    name: String,
    #[serde(default)]
    links: Vec<SeedLink>,
}

#[derive(Deserialize)]
struct SeedLink {
    title: String,
    url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => HubConfig::from_env()?,
    };

    let mut hub = Hub::open(MemoryStore::new(), config).await?;
    hub.sync();

    if let Some(path) = &args.seed {
        let seeds: Vec<SeedProject> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        for seed in seeds {
            let RequestOutcome::ProjectCreated(project_id) = hub
                .submit(PendingRequest::CreateProject { name: seed.name })
                .await?
            else {
                continue;
            };
            hub.sync();
            for link in seed.links {
                hub.submit(PendingRequest::CreateLink {
                    project_id: project_id.clone(),
                    title: link.title,
                    url: link.url,
                })
                .await?;
            }
        }
        hub.sync();
    }

    if let Some(name) = &args.select {
        let id = find_project(&hub, name)?;
        hub.select_project(&id);
    }

    if let Some(name) = &args.delete {
        let id = find_project(&hub, name)?;
        hub.submit(PendingRequest::delete_project(id)).await?;
        hub.sync();
    }

    if let Some(query) = args.query {
        hub.set_query(query);
    }

    print_session(&hub);
    hub.close();
    Ok(())
}

fn find_project(hub: &Hub<MemoryStore>, name: &str) -> anyhow::Result<linkhub::ProjectId> {
    hub.store()
        .projects()
        .iter()
        .find(|project| project.name == name)
        .map(|project| project.id.clone())
        .ok_or_else(|| anyhow::anyhow!("No project named {:?}", name))
}

fn print_session(hub: &Hub<MemoryStore>) {
    println!("=== Projects ===");
    for project in hub.filtered_projects() {
        let marker = if hub.selection().is_some_and(|selected| selected.id == project.id) {
            '*'
        } else {
            ' '
        };
        println!(" {} {}", marker, project.name);
    }

    if !hub.query().is_empty() {
        println!("\n=== Search Results ===");
        for hit in hub.search_results() {
            println!("  [{}] {} <{}>", hit.project.name, hit.link.title, hit.link.url);
        }
    } else if let Some(project) = hub.selection() {
        println!("\n=== {} ===", project.name);
        for link in hub.filtered_links() {
            println!("  {} <{}>", link.title, link.url);
        }
    } else {
        println!("\nNo projects yet. Seed some with --seed.");
    }

    if let Some(notice) = hub.notice() {
        eprintln!("\nerror: {}", notice);
    }
}
