use anyhow::Context;
use clap::Parser;
use sales_dashboard::cli::{export_settings, Cli, Commands};
use sales_report::data::SalesLoader;
use sales_report::export::export;
use sales_report::render::{render, summary_view, table_view};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli
        .resolve_config()
        .context("failed to load dashboard configuration")?;
    let store = SalesLoader::from_path(&config.input)
        .with_context(|| format!("failed to load sales data from {}", config.input.display()))?;

    match cli.command {
        Commands::Show { filter, json } => {
            let criteria = filter.criteria(&store);
            let model = render(
                store.records(),
                &criteria,
                filter.window(&config),
                &config.forecast,
            )?;

            if json {
                println!("{}", model.to_json()?);
            } else {
                println!("{}", table_view(&model.table));
                println!("{}", summary_view(&model));
            }
        }
        Commands::Export {
            filter,
            format,
            out_dir,
        } => {
            let criteria = filter.criteria(&store);
            let model = render(
                store.records(),
                &criteria,
                filter.window(&config),
                &config.forecast,
            )?;
            let settings = export_settings(&config, out_dir);

            let path = export(format, &model, &settings)
                .with_context(|| format!("failed to export to {}", settings.out_dir.display()))?;
            info!(format = ?format, "export finished");
            println!("Wrote {} ({}).", path.display(), format.mime_type());
        }
        Commands::Products => {
            let products = store.products();
            if products.is_empty() {
                println!("No sales records in {}.", config.input.display());
                return Ok(());
            }

            if let Some((first, last)) = store.date_bounds() {
                println!("Sales from {} to {} ({} rows)", first, last, store.len());
            }
            for product in products {
                println!("- {}", product);
            }
        }
    }

    Ok(())
}
