//! shipdesk CLI
//!
//! Admin console for the shipdesk API: browse a resource, bulk delete,
//! bulk status updates and Buy4me invoices.

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use shipdesk_client::{
    ApiClient, AuthContext, ClientConfig, Credentials, HyperTransport, InvoiceDraft, RemoteList,
    Resource, ShippingMethod, BASE_URL_ENV,
};
use shipdesk_list::{BulkReport, ListController, PageLink, RecordId, SortState};

/// Admin console for the shipdesk API.
#[derive(Parser)]
#[command(name = "shipdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API base URL, e.g. http://localhost:8000.
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// Access token.
    #[arg(long, env = "SHIPDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Refresh token, used once when the access token is rejected.
    #[arg(long, env = "SHIPDESK_REFRESH_TOKEN", hide_env_values = true)]
    refresh_token: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a resource.
    List {
        /// Resource name (shipping-marks, trackings, products, orders,
        /// buy4me, invoices, users, categories).
        resource: String,

        /// Search term.
        #[arg(short, long)]
        search: Option<String>,

        /// Sort column; `-field` sorts descending, repeating a field
        /// toggles its direction.
        #[arg(long)]
        sort: Vec<String>,

        /// Page number.
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Items per page.
        #[arg(long)]
        page_size: Option<usize>,

        /// Filter as field=value.
        #[arg(short, long)]
        filter: Vec<String>,
    },

    /// Delete records.
    Delete {
        /// Resource name.
        resource: String,

        /// Record ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Set the status of records.
    SetStatus {
        /// Resource name.
        resource: String,

        /// New status.
        status: String,

        /// Record ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Issue the invoice of a Buy4me request.
    Invoice {
        /// Buy4me request id.
        request_id: String,

        /// Product cost in RMB.
        #[arg(long)]
        cost: f64,

        /// RMB to GHS exchange rate.
        #[arg(long)]
        rate: f64,

        /// Shipping method (sea or air).
        #[arg(long, default_value = "sea")]
        shipping: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let base_url = cli
        .base_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| anyhow!("no API base URL; pass --base-url or set {BASE_URL_ENV}"))?;
    let config = ClientConfig::new().base_url(&base_url);
    debug!(base_url = %config.base_url, "using API");

    let auth = AuthContext::from_credentials(Credentials {
        access: cli.token,
        refresh: cli.refresh_token,
    });
    let client = ApiClient::with_config(HyperTransport::new(&config), auth, config);

    match cli.command {
        Commands::List {
            resource,
            search,
            sort,
            page,
            page_size,
            filter,
        } => {
            let resource = resource_named(&resource)?;
            let mut list = RemoteList::new(client, resource);
            let view = ListView {
                search,
                sort,
                page,
                page_size,
                filter,
            };
            view.apply(list.controller_mut())?;

            list.load().await?;
            print_page(resource, list.controller());
        }

        Commands::Delete { resource, ids } => {
            let resource = resource_named(&resource)?;
            let mut list = RemoteList::new(client, resource);
            select(list.controller_mut(), &ids);
            let report = list.bulk_delete().await?;
            finish_report(&report)?;
        }

        Commands::SetStatus {
            resource,
            status,
            ids,
        } => {
            let resource = resource_named(&resource)?;
            if resource.status_route.is_none() {
                bail!("{} have no status", resource.label);
            }
            let mut list = RemoteList::new(client, resource);
            select(list.controller_mut(), &ids);
            let report = list.bulk_update_status(&status).await?;
            finish_report(&report)?;
        }

        Commands::Invoice {
            request_id,
            cost,
            rate,
            shipping,
        } => {
            let shipping = ShippingMethod::parse(&shipping)
                .with_context(|| format!("unknown shipping method {shipping:?}"))?;
            let draft = InvoiceDraft::new(cost, rate).shipping_method(shipping);
            if let Err(errors) = draft.validate() {
                bail!("invalid invoice: {errors}");
            }

            let totals = draft.totals();
            println!("Product cost:  GHS {:.2}", totals.product_cost_ghs);
            println!(
                "Service fee:   GHS {:.2} ({}%)",
                totals.service_fee, draft.service_fee_percent
            );
            println!("Total:         GHS {:.2}", totals.total);

            let invoice = client
                .create_invoice(&RecordId::from(request_id), &draft)
                .await
                .map_err(|e| anyhow!(e.user_message()))?;
            println!("{}", serde_json::to_string_pretty(&invoice)?);
        }
    }

    Ok(())
}

/// List state asked for on the command line.
struct ListView {
    search: Option<String>,
    sort: Vec<String>,
    page: usize,
    page_size: Option<usize>,
    filter: Vec<String>,
}

impl ListView {
    fn apply(self, controller: &mut ListController) -> anyhow::Result<()> {
        if let Some(size) = self.page_size {
            controller.set_page_size(size)?;
        }
        if let Some(term) = self.search {
            controller.set_search(term);
        }
        for field in &self.sort {
            match field.strip_prefix('-') {
                Some(field) => controller.set_sort(Some(SortState::descending(field)))?,
                None => {
                    controller.sort_by(field)?;
                }
            }
        }
        for pair in &self.filter {
            let (field, value) = pair
                .split_once('=')
                .with_context(|| format!("filter {pair:?} is not field=value"))?;
            controller.set_filter(field, value)?;
        }
        // clamped once the total is known
        controller.request_page(self.page);
        Ok(())
    }
}

fn resource_named(name: &str) -> anyhow::Result<Resource> {
    Resource::by_name(name).ok_or_else(|| {
        let known: Vec<&str> = Resource::ALL.iter().map(|r| r.name).collect();
        anyhow!("unknown resource {name:?}; expected one of {}", known.join(", "))
    })
}

fn select(controller: &mut ListController, ids: &[String]) {
    for id in ids {
        let id = RecordId::from(id.as_str());
        if !controller.is_selected(&id) {
            controller.toggle_selected(&id);
        }
    }
}

fn finish_report(report: &BulkReport) -> anyhow::Result<()> {
    for failure in &report.failed {
        println!("  {}: {}", failure.id, failure.reason);
    }
    if report.is_complete() {
        println!("{}", report.summary());
        Ok(())
    } else {
        bail!("{}", report.summary())
    }
}

fn print_page(resource: Resource, controller: &ListController) {
    const MAX_WIDTH: usize = 40;

    let view = controller.view();
    let columns = &controller.config().list_display;
    let rows: Vec<Vec<String>> = view
        .records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|col| truncate(&record.text(col), MAX_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(col.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    println!("{}", resource.label);
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(col, &w)| format!("{col:<w$}"))
        .collect();
    println!("{}", header.join("  "));
    let rule = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    println!("{}", "-".repeat(rule));
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        println!("{}", cells.join("  "));
    }

    println!();
    println!("{}", view.page.summary());
    let links: Vec<String> = view
        .window
        .iter()
        .map(|link| match link {
            PageLink::Page(n) if *n == view.page.page => format!("[{n}]"),
            PageLink::Page(n) => n.to_string(),
            PageLink::Gap => "...".to_string(),
        })
        .collect();
    println!("{}", links.join(" "));
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
