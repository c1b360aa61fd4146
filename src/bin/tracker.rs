use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};

use finance_tracker::client::api::DEFAULT_API_URL;
use finance_tracker::client::{
    ApiService, FormField, InvestmentApi, InvestmentClient, InvestmentForm, LocalApi, LocalStorage,
};
use finance_tracker::logging::{init_logging, LoggingConfig};
use finance_tracker::models::{Investment, InvestmentKind, InvestmentType};

/// Terminal front end for the finance tracker.
#[derive(Parser, Debug)]
#[command(name = "tracker")]
struct Cli {
    /// Base URL of the tracker API.
    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Keep investments in this local file instead of talking to a server.
    /// Takes precedence over --api-url.
    #[arg(long)]
    local: Option<PathBuf>,

    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every investment.
    List,
    /// Total value and allocation by type.
    Summary,
    /// Show one investment.
    Show { id: String },
    /// Record a new investment.
    Add(AddArgs),
    /// Change an existing investment.
    Edit(EditArgs),
    /// Remove an investment.
    Delete { id: String },
    /// Check that the backend is reachable.
    Health,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long = "type", default_value = "Stock")]
    investment_type: InvestmentType,
    #[arg(long)]
    name: String,
    #[arg(long)]
    amount: String,
    /// Purchase date (YYYY-MM-DD), today when omitted.
    #[arg(long)]
    date: Option<String>,
    /// Type-specific input as name=value, e.g. --field ticker=INFY
    #[arg(long = "field", value_parser = parse_key_val)]
    fields: Vec<(String, String)>,
}

#[derive(Debug, Args)]
struct EditArgs {
    id: String,
    /// Switch to another type; inputs of the old type are dropped.
    #[arg(long = "type")]
    investment_type: Option<InvestmentType>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    amount: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long = "field", value_parser = parse_key_val)]
    fields: Vec<(String, String)>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    Ok((key.trim().to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(LoggingConfig::console(&cli.log_level))
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    match &cli.local {
        Some(path) => {
            let api = LocalApi::new(LocalStorage::new(path));
            run(InvestmentClient::new(api), cli.command).await
        }
        None => {
            let api = ApiService::new(&cli.api_url)?;
            run(InvestmentClient::new(api), cli.command).await
        }
    }
}

async fn run<A: InvestmentApi>(mut client: InvestmentClient<A>, command: Command) -> Result<()> {
    match command {
        Command::Health => {
            let status = client.health().await?;
            println!("status: {}", status.status);
        }
        Command::List => {
            client.load().await?;
            print_list(client.investments());
        }
        Command::Summary => {
            client.load().await?;
            print_summary(&client);
        }
        Command::Show { id } => {
            client.load().await?;
            let investment = client
                .find(&id)
                .ok_or_else(|| anyhow!("Investment not found: {}", id))?;
            print_details(investment);
        }
        Command::Add(args) => {
            let form = client.begin_create();
            form.select_type(args.investment_type);
            form.set(FormField::Name, args.name);
            form.set(FormField::Amount, args.amount);
            if let Some(date) = args.date {
                form.set(FormField::PurchaseDate, date);
            }
            apply_fields(form, &args.fields)?;
            save_form(&mut client).await?;
        }
        Command::Edit(args) => {
            client.load().await?;
            let existing = client
                .find(&args.id)
                .cloned()
                .ok_or_else(|| anyhow!("Investment not found: {}", args.id))?;

            let form = client.begin_edit(&existing);
            if let Some(investment_type) = args.investment_type {
                form.select_type(investment_type);
            }
            if let Some(name) = args.name {
                form.set(FormField::Name, name);
            }
            if let Some(amount) = args.amount {
                form.set(FormField::Amount, amount);
            }
            if let Some(date) = args.date {
                form.set(FormField::PurchaseDate, date);
            }
            apply_fields(form, &args.fields)?;
            save_form(&mut client).await?;
        }
        Command::Delete { id } => {
            let removed = client.remove(&id).await?;
            println!("Deleted {} ({})", removed.id, removed.name);
        }
    }
    Ok(())
}

/// Sets the `--field` inputs, which must belong to the selected type.
fn apply_fields(form: &mut InvestmentForm, fields: &[(String, String)]) -> Result<()> {
    let investment_type = form.investment_type();
    let expected = FormField::for_type(investment_type);
    for (name, value) in fields {
        let field = FormField::from_name(name).with_context(|| format!("cannot set '{}'", name))?;
        if !expected.contains(&field) {
            return Err(anyhow!(
                "'{}' does not apply to {}; expected one of: {}",
                name,
                investment_type,
                field_names(expected)
            ));
        }
        form.set(field, value.clone());
    }
    Ok(())
}

fn field_names(fields: &[FormField]) -> String {
    fields.iter().map(|f| f.name()).collect::<Vec<_>>().join(", ")
}

async fn save_form<A: InvestmentApi>(client: &mut InvestmentClient<A>) -> Result<()> {
    let editing = client.form().is_some_and(InvestmentForm::is_editing);
    let saved = client.save().await?;
    println!("{} {}", if editing { "Updated" } else { "Added" }, saved.id);
    print_details(&saved);
    Ok(())
}

fn print_list(investments: &[Investment]) {
    if investments.is_empty() {
        println!("No investments found. Add one to get started!");
        return;
    }
    println!("{:<38} {:<14} {:<28} {:>18} {:<10}", "ID", "TYPE", "NAME", "AMOUNT", "PURCHASED");
    for inv in investments {
        println!(
            "{:<38} {:<14} {:<28} {:>18} {:<10}",
            inv.id,
            inv.investment_type(),
            inv.name,
            format_amount(inv.amount),
            inv.purchase_date
        );
    }
}

fn print_summary<A: InvestmentApi>(client: &InvestmentClient<A>) {
    println!("Total portfolio value: {}", format_amount(client.total_value()));
    let allocation = client.allocation();
    if allocation.is_empty() {
        return;
    }
    println!();
    println!("Asset allocation");
    for slice in &allocation.slices {
        println!(
            "  {:<14} {:>18} {:>6.1}%",
            slice.investment_type,
            format_amount(slice.value),
            allocation.percentage(slice)
        );
    }
}

fn print_details(inv: &Investment) {
    println!("  id:            {}", inv.id);
    println!("  type:          {}", inv.investment_type());
    println!("  name:          {}", inv.name);
    println!("  amount:        {}", format_amount(inv.amount));
    println!("  purchase date: {}", inv.purchase_date);
    match &inv.kind {
        InvestmentKind::Stock { ticker, shares } => {
            println!("  ticker:        {}", ticker);
            println!("  shares:        {}", shares);
        }
        InvestmentKind::MutualFund { fund_house, units } => {
            println!("  fund house:    {}", fund_house);
            println!("  units:         {}", units);
        }
        InvestmentKind::FixedDeposit { bank, interest_rate, maturity_date } => {
            println!("  bank:          {}", bank);
            println!("  interest rate: {}%", interest_rate);
            if let Some(date) = maturity_date {
                println!("  maturity date: {}", date);
            }
        }
        InvestmentKind::Bond { issuer, coupon_rate, maturity_date } => {
            println!("  issuer:        {}", issuer);
            println!("  coupon rate:   {}%", coupon_rate);
            if let Some(date) = maturity_date {
                println!("  maturity date: {}", date);
            }
        }
        InvestmentKind::Cash { location, currency } => {
            println!("  location:      {}", location);
            println!("  currency:      {}", currency);
        }
    }
}

/// Rupee amount with Indian digit grouping, e.g. `₹12,34,567.50`.
fn format_amount(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let grouped = if whole.len() <= 3 {
        whole.to_string()
    } else {
        let (head, last_three) = whole.split_at(whole.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (left, right) = rest.split_at(rest.len() - 2);
            groups.push(right);
            rest = left;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{}", groups.join(","), last_three)
    };
    format!("{}₹{}.{}", sign, grouped, fraction)
}
