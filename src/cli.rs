//! CLI interface for Opsdesk.
//!
//! Each subcommand is non-interactive: arguments in, table or one-line
//! confirmation out. Diagnostics and audit warnings go to stderr.
//!
//! Commands that change records act on behalf of an admin, resolved from
//! `--as`, `OPSDESK_ADMIN`, or the config file, in that order.

mod format;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::console::{Console, NewDrone, NewPayment};
use crate::fixtures;
use crate::identity::resolve_admin;
use crate::lifecycle::{self, Status, Workflow};
use crate::model::{
    Amount, Appointment, BatteryHealth, Drone, Entity, Order, Payment, PaymentMethod, Product,
    ServiceListing,
};
use crate::query::{Listing, PageSize, QueryParams, QueryResult};
use crate::storage::Storage;

use format::{Row, format_summary, format_table};

/// Opsdesk: the marketplace operations console.
#[derive(Debug, Parser)]
#[command(name = "opsdesk", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Acting admin, recorded in the audit log for every change.
    #[arg(long = "as", global = true, value_name = "ADMIN")]
    acting_as: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: moving an order along
  1. opsdesk seed
  2. opsdesk list orders --facet status=pending
  3. opsdesk --as admin-01 transition order ORD-2024-004 processing
  4. opsdesk log --search order.status_changed

Browsing:
  opsdesk list drones --facet model=DC-500 --page-size 10
  opsdesk list drones --options model
  opsdesk list appointments --search john --page 2";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the demo data into an empty database.
    ///
    /// Collections that already hold records are left alone.
    Seed,

    /// Search, filter, and page through a collection.
    List {
        collection: CollectionArg,

        #[command(flatten)]
        page: PageArgs,

        /// Exact-match filter, e.g. `status=pending`. Repeatable; `All` clears a facet.
        #[arg(long = "facet", value_name = "NAME=VALUE", value_parser = parse_facet)]
        facets: Vec<(String, String)>,

        /// Print the values present for one facet instead of the list.
        #[arg(long, value_name = "FACET")]
        options: Option<String>,
    },

    /// Move a record to a new status.
    ///
    /// Only the moves in each record's status machine are accepted, and
    /// nothing leaves a final status. Every accepted move is audited.
    Transition {
        kind: WorkflowArg,

        /// Record ID, e.g. `ORD-2024-004`.
        id: String,

        /// Target status as displayed, e.g. `processing` or `Maintenance`.
        status: String,
    },

    /// Record payments.
    Payment {
        #[command(subcommand)]
        command: PaymentCommand,
    },

    /// Manage the drone fleet.
    Drone {
        #[command(subcommand)]
        command: DroneCommand,
    },

    /// Browse the admin log.
    Log {
        #[command(flatten)]
        page: PageArgs,

        /// Only entries by this admin.
        #[arg(long)]
        admin: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaymentCommand {
    /// Record a new pending payment. Prints its reference number.
    New {
        /// Paying user's ID.
        #[arg(long)]
        user: String,

        /// Amount in pesos, e.g. `1500` or `1500.50`.
        #[arg(long)]
        amount: Amount,

        #[arg(long, value_enum)]
        method: MethodArg,

        /// Reference number; generated when omitted. Must be unique.
        #[arg(long)]
        reference: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum DroneCommand {
    /// Add a drone to the fleet as Active. Prints its ID.
    Register {
        #[arg(long)]
        name: String,

        /// Model designation, e.g. `DC-500`.
        #[arg(long)]
        model: String,

        /// Manufacturer serial. Must be unique across the fleet.
        #[arg(long)]
        serial: String,

        /// Maximum payload in kilograms.
        #[arg(long, value_parser = parse_capacity)]
        capacity: f64,

        /// Battery health percentage.
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
        battery: u8,
    },
}

/// Search and paging flags shared by `list` and `log`.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Case-insensitive substring to look for.
    #[arg(long)]
    search: Option<String>,

    /// Page number; out-of-range values are clamped.
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page: 5, 10, 15, or 20. Defaults to `page-size` from config.
    #[arg(long)]
    page_size: Option<PageSize>,
}

impl PageArgs {
    fn params(&self, config: &Config) -> QueryParams {
        let params = QueryParams::new(self.page_size.unwrap_or(config.page_size)).page(self.page);
        match &self.search {
            Some(text) => params.search(text),
            None => params,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CollectionArg {
    Appointments,
    Services,
    Products,
    Orders,
    Drones,
    Payments,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WorkflowArg {
    Appointment,
    Order,
    Drone,
    Payment,
}

/// CLI-facing payment method, mapped to the domain `PaymentMethod`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Gcash,
    Cod,
}

impl MethodArg {
    fn to_domain(self) -> PaymentMethod {
        match self {
            Self::Gcash => PaymentMethod::GCash,
            Self::Cod => PaymentMethod::Cod,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();
    let acting_as = cli.acting_as.as_deref();

    match cli.command {
        Command::Seed => {
            let console = Console::new(storage, resolve_admin(acting_as, config)?);
            cmd_seed(&console)
        }
        Command::List {
            collection,
            page,
            facets,
            options,
        } => {
            // Reads are never audited, so no admin is required.
            let console = reader(storage, acting_as, config);
            let list = ListRequest {
                params: page.params(config),
                facets: &facets,
                options: options.as_deref(),
            };
            match collection {
                CollectionArg::Appointments => cmd_list::<Appointment>(&console, &list),
                CollectionArg::Services => cmd_list::<ServiceListing>(&console, &list),
                CollectionArg::Products => cmd_list::<Product>(&console, &list),
                CollectionArg::Orders => cmd_list::<Order>(&console, &list),
                CollectionArg::Drones => cmd_list::<Drone>(&console, &list),
                CollectionArg::Payments => cmd_list::<Payment>(&console, &list),
            }
        }
        Command::Transition { kind, id, status } => {
            let console = Console::new(storage, resolve_admin(acting_as, config)?);
            match kind {
                WorkflowArg::Appointment => cmd_transition::<Appointment>(&console, &id, &status),
                WorkflowArg::Order => cmd_transition::<Order>(&console, &id, &status),
                WorkflowArg::Drone => cmd_transition::<Drone>(&console, &id, &status),
                WorkflowArg::Payment => cmd_transition::<Payment>(&console, &id, &status),
            }
        }
        Command::Payment {
            command:
                PaymentCommand::New {
                    user,
                    amount,
                    method,
                    reference,
                },
        } => {
            let console = Console::new(storage, resolve_admin(acting_as, config)?);
            cmd_payment_new(
                &console,
                NewPayment {
                    user_id: user,
                    amount,
                    method: method.to_domain(),
                    reference_number: reference,
                },
            )
        }
        Command::Drone {
            command:
                DroneCommand::Register {
                    name,
                    model,
                    serial,
                    capacity,
                    battery,
                },
        } => {
            let console = Console::new(storage, resolve_admin(acting_as, config)?);
            let battery_health = BatteryHealth::try_from(battery).map_err(|e| e.to_string())?;
            cmd_drone_register(
                &console,
                NewDrone {
                    name,
                    model,
                    serial_number: serial,
                    load_capacity: capacity,
                    battery_health,
                },
            )
        }
        Command::Log { page, admin } => {
            let console = reader(storage, acting_as, config);
            let mut params = page.params(config);
            if let Some(admin) = admin {
                params = params.facet("admin_id", &admin);
            }
            cmd_log(&console, &params)
        }
    }
}

/// A console for read-only commands.
fn reader<'a>(storage: &'a Storage, acting_as: Option<&str>, config: &Config) -> Console<'a> {
    Console::new(storage, resolve_admin(acting_as, config).unwrap_or_default())
}

fn cmd_seed(console: &Console<'_>) -> Result<(), String> {
    let source = fixtures::source().map_err(|e| format!("failed to build demo data: {e}"))?;
    let report = console
        .seed(&source)
        .map_err(|e| format!("failed to seed: {e}"))?;

    if report.total() == 0 {
        println!("Nothing to seed; every collection already has records");
        return Ok(());
    }
    println!(
        "Seeded {} appointments, {} services, {} products, {} orders, {} drones",
        report.appointments, report.services, report.products, report.orders, report.drones
    );
    Ok(())
}

struct ListRequest<'a> {
    params: QueryParams,
    facets: &'a [(String, String)],
    options: Option<&'a str>,
}

fn cmd_list<R: Entity + Row>(
    console: &Console<'_>,
    request: &ListRequest<'_>,
) -> Result<(), String> {
    if let Some(facet) = request.options {
        require_facet::<R>(facet)?;
        let options = console
            .facet_options::<R>(facet)
            .map_err(|e| format!("failed to load {}: {e}", R::KIND.plural()))?;
        for option in options {
            println!("{option}");
        }
        return Ok(());
    }

    let mut params = request.params.clone();
    for (name, value) in request.facets {
        require_facet::<R>(name)?;
        params = params.facet(name, value);
    }

    let result = console
        .list::<R>(&params)
        .map_err(|e| format!("failed to list {}: {e}", R::KIND.plural()))?;
    print_page(&result, R::KIND.plural());
    Ok(())
}

fn cmd_transition<R: Workflow>(
    console: &Console<'_>,
    id: &str,
    status: &str,
) -> Result<(), String> {
    let target = lifecycle::parse_status::<R>(status).map_err(|e| {
        let choices: Vec<&str> = R::Status::ALL.iter().copied().map(Status::as_str).collect();
        format!("{e}; expected one of: {}", choices.join(", "))
    })?;

    let done = console
        .transition::<R>(id, target)
        .map_err(|e| e.to_string())?;

    println!("{} {id}: {} -> {target}", R::KIND, done.from);
    if let Err(e) = &done.audit {
        eprintln!("warning: the change was applied but not recorded in the admin log: {e}");
    }
    Ok(())
}

fn cmd_payment_new(console: &Console<'_>, new: NewPayment) -> Result<(), String> {
    let created = console
        .create_payment(new)
        .map_err(|e| format!("failed to create payment: {e}"))?;

    println!("{}", created.record.reference_number);
    if let Err(e) = &created.audit {
        eprintln!("warning: payment created but not recorded in the admin log: {e}");
    }
    Ok(())
}

fn cmd_drone_register(console: &Console<'_>, new: NewDrone) -> Result<(), String> {
    let created = console
        .register_drone(new)
        .map_err(|e| format!("failed to register drone: {e}"))?;

    println!("{}", created.record.id);
    if let Err(e) = &created.audit {
        eprintln!("warning: drone registered but not recorded in the admin log: {e}");
    }
    Ok(())
}

fn cmd_log(console: &Console<'_>, params: &QueryParams) -> Result<(), String> {
    let result = console
        .admin_log(params)
        .map_err(|e| format!("failed to load admin log: {e}"))?;
    print_page(&result, "log entries");
    Ok(())
}

fn print_page<R: Row>(result: &QueryResult<R>, noun: &str) {
    if !result.page.items.is_empty() {
        println!("{}\n", format_table(&result.page.items));
    }
    println!("{}", format_summary(result, noun));
    if result.page.has_next() {
        println!("More: --page {}", result.page.page_number + 1);
    }
}

fn require_facet<R: Listing>(name: &str) -> Result<(), String> {
    if R::FACET_FIELDS.contains(&name) {
        return Ok(());
    }
    Err(format!(
        "unknown facet '{name}'; expected one of: {}",
        R::FACET_FIELDS.join(", ")
    ))
}

/// Parse `name=value` into a facet pair.
fn parse_facet(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing facet name in '{s}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Payload in kilograms: finite and not negative.
fn parse_capacity(s: &str) -> Result<f64, String> {
    let kg: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid capacity '{s}'"))?;
    if !kg.is_finite() || kg < 0.0 {
        return Err(format!("capacity must be a non-negative number of kg, got '{s}'"));
    }
    Ok(kg)
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn facet_pairs() {
        assert_eq!(
            parse_facet("status=for_delivery").unwrap(),
            ("status".to_string(), "for_delivery".to_string())
        );
        assert_eq!(
            parse_facet("status=Out of Stock").unwrap(),
            ("status".to_string(), "Out of Stock".to_string())
        );
        assert!(parse_facet("status").is_err());
        assert!(parse_facet("=Active").is_err());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn capacity_must_be_finite_and_non_negative() {
        assert_eq!(parse_capacity("2.5").unwrap(), 2.5);
        assert_eq!(parse_capacity("0").unwrap(), 0.0);
        for bad in ["-1", "NaN", "inf", "-inf", "heavy"] {
            assert!(parse_capacity(bad).is_err(), "{bad} accepted");
        }

        let rejected = Cli::try_parse_from([
            "opsdesk", "drone", "register", "--name", "Kite", "--model", "DC-500", "--serial",
            "SN-1", "--capacity=-3",
        ]);
        assert!(rejected.is_err());
    }

    #[test]
    fn facets_checked_against_listing() {
        assert!(require_facet::<Drone>("model").is_ok());
        let err = require_facet::<Drone>("serial_number").unwrap_err();
        assert!(err.contains("model, status"));
    }

    #[test]
    fn parses_list_flags() {
        let cli = Cli::try_parse_from([
            "opsdesk",
            "list",
            "drones",
            "--facet",
            "model=DC-500",
            "--page-size",
            "10",
            "--page",
            "2",
        ])
        .unwrap();

        let Command::List {
            collection,
            page,
            facets,
            options,
        } = cli.command
        else {
            panic!("expected list");
        };
        assert!(matches!(collection, CollectionArg::Drones));
        assert_eq!(facets, vec![("model".to_string(), "DC-500".to_string())]);
        assert_eq!(options, None);

        let params = page.params(&Config::default());
        assert_eq!(params.page_size(), PageSize::Ten);
        assert_eq!(params.page_number(), 2);
    }

    #[test]
    fn rejects_unsupported_page_size() {
        let result = Cli::try_parse_from(["opsdesk", "list", "orders", "--page-size", "7"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_page_size_is_the_fallback() {
        let cli = Cli::try_parse_from(["opsdesk", "log"]).unwrap();
        let Command::Log { page, .. } = cli.command else {
            panic!("expected log");
        };
        let config = Config {
            page_size: PageSize::Twenty,
            ..Config::default()
        };
        assert_eq!(page.params(&config).page_size(), PageSize::Twenty);
    }

    #[test]
    fn global_admin_flag_after_subcommand() {
        let cli = Cli::try_parse_from([
            "opsdesk",
            "transition",
            "order",
            "ORD-2024-004",
            "processing",
            "--as",
            "admin-02",
        ])
        .unwrap();
        assert_eq!(cli.acting_as.as_deref(), Some("admin-02"));
    }

    #[test]
    fn payment_amount_parsed() {
        let cli = Cli::try_parse_from([
            "opsdesk", "payment", "new", "--user", "USR-001", "--amount", "1500.50", "--method",
            "gcash",
        ])
        .unwrap();
        let Command::Payment {
            command: PaymentCommand::New { amount, .. },
        } = cli.command
        else {
            panic!("expected payment new");
        };
        assert_eq!(amount, Amount::from_centavos(150_050));
    }
}
