use anyhow::Context;
use clap::ArgMatches;
use pet_admin_cli::commands::{describe_payload, http_ports, run_breeds, run_edit, run_serve, EditOutcome, InvalidForm};
use pet_admin_cli::{command, init_tracing, FormEdits};
use pet_admin_core::{AdminConfig, RecordId};
use std::net::SocketAddr;
use std::path::PathBuf;

fn load_config(matches: &ArgMatches) -> anyhow::Result<AdminConfig> {
    let path = matches.get_one::<PathBuf>("config");
    let config = AdminConfig::load_or_default(path.map(PathBuf::as_path))
        .with_context(|| format!("failed to load config {:?}", path))?;
    Ok(match matches.get_one::<String>("base-url") {
        Some(base_url) => config.with_base_url(base_url.clone()),
        None => config,
    })
}

fn edits_from(args: &ArgMatches) -> FormEdits {
    let text = |name: &str| args.get_one::<String>(name).cloned();
    FormEdits {
        name: text("name"),
        age: text("age"),
        description: text("description"),
        breed: text("breed"),
        sex: text("sex"),
        weight: text("weight"),
        image: args.get_one::<PathBuf>("image").cloned(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = command().get_matches();
    let config = load_config(&matches)?;
    init_tracing(&config.logging)?;

    match matches.subcommand() {
        Some(("serve", args)) => {
            let bind = args
                .get_one::<SocketAddr>("bind")
                .copied()
                .context("missing --bind")?;
            run_serve(&config, bind).await?;
        }
        Some(("edit", args)) => {
            let id = args.get_one::<String>("id").context("missing record id")?;
            let (store, taxonomy) = http_ports(&config)?;
            let outcome = run_edit(
                store,
                taxonomy.as_ref(),
                RecordId::new(id.as_str()),
                edits_from(args),
                args.get_flag("dry-run"),
            )
            .await;

            match outcome {
                Ok(EditOutcome::Updated(navigation)) => {
                    println!("Record {id} updated; continue at {}", navigation.to);
                }
                Ok(EditOutcome::DryRun(payload)) => {
                    print!("{}", describe_payload(&payload));
                }
                Err(e) => {
                    if let Some(invalid) = e.downcast_ref::<InvalidForm>() {
                        for (field, message) in invalid.errors.messages() {
                            eprintln!("{}: {message}", field.label());
                        }
                    }
                    return Err(e);
                }
            }
        }
        Some(("breeds", _)) => {
            let (_, taxonomy) = http_ports(&config)?;
            for option in run_breeds(taxonomy.as_ref()).await? {
                println!("{}\t{}", option.id, option.label);
            }
        }
        _ => anyhow::bail!("a subcommand is required"),
    }

    Ok(())
}
