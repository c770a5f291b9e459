use crate::infra::{load_catalog, parse_decimal, parse_instant, InMemoryOrderRepository};
use athletic_labs::config::{AppConfig, PricingConfig};
use athletic_labs::error::AppError;
use athletic_labs::ordering::{
    compute_pricing, CartSelection, CartSource, ContactDetails, DeliveryDetails, MenuCatalog,
    MenuItemFilter, OrderRequest, OrderService, OrderStatus, PortionSize, PricingResult,
    Principal, SectionCategory, TemplateId,
};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Price per person for the selected bundle, e.g. 49.00
    #[arg(long, value_parser = parse_decimal)]
    pub(crate) unit_price: Decimal,
    /// Number of people the order feeds
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) people: i64,
    /// Override the configured sales tax rate (e.g. 0.0875)
    #[arg(long, value_parser = parse_decimal)]
    pub(crate) tax_rate: Option<Decimal>,
    /// Requested delivery instant; omit for an undated quote
    #[arg(long, value_parser = parse_instant)]
    pub(crate) delivery: Option<DateTime<Utc>>,
    /// Reference instant for the rush check (defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// CSV export of menu templates (defaults to CATALOG_CSV or the seeded bundles)
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Also list the a la carte menu items by section
    #[arg(long)]
    pub(crate) items: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Team placing the demo orders
    #[arg(long, default_value = "demo-team")]
    pub(crate) team: String,
    /// Reference instant for the walkthrough (defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let pricing = AppConfig::load()?.pricing;
    let now = args.now.unwrap_or_else(Utc::now);
    let tax_rate = args.tax_rate.unwrap_or(pricing.tax_rate);

    let result = compute_pricing(
        args.unit_price,
        args.people,
        tax_rate,
        args.delivery,
        now,
        &pricing.rush_policy(),
    )?;

    if args.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Quote unavailable as JSON: {err}"),
        }
        return Ok(());
    }

    println!(
        "Quote for {} people at ${} per person",
        args.people, args.unit_price
    );
    render_pricing(&result, tax_rate, &pricing);
    Ok(())
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let csv_path = match args.csv {
        Some(path) => Some(path),
        None => AppConfig::load()?.catalog.csv_path,
    };
    let catalog = load_catalog(csv_path.as_deref())?;
    render_catalog(&catalog);
    if args.items {
        render_menu_items(&catalog);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let pricing = PricingConfig::default();
    let catalog = MenuCatalog::standard();
    println!("Athletic Labs ordering demo for team {}", args.team);
    render_catalog(&catalog);

    let service = OrderService::new(
        Arc::new(InMemoryOrderRepository::default()),
        catalog,
        pricing,
    );
    let team = Principal::team(args.team.clone());
    let admin = Principal::Admin;

    let bundles = match service.active_templates() {
        Ok(bundles) => bundles,
        Err(err) => {
            println!("Catalog unavailable: {err}");
            return Ok(());
        }
    };
    let Some(first) = bundles.first().map(|template| template.id.clone()) else {
        println!("No active menu templates; nothing to order.");
        return Ok(());
    };
    let second = bundles
        .get(1)
        .map(|template| template.id.clone())
        .unwrap_or_else(|| first.clone());

    println!("\nCart preview");
    let mut selections = vec![CartSelection {
        source: CartSource::Bundle {
            template_id: first.clone(),
        },
        quantity: 1,
    }];
    let protein = MenuItemFilter {
        category: Some(SectionCategory::BaseProteins),
        ..MenuItemFilter::default()
    };
    let first_protein = service
        .menu_items(&protein)
        .ok()
        .and_then(|items| items.into_iter().next());
    if let Some(item) = first_protein {
        selections.push(CartSelection {
            source: CartSource::MenuItem {
                menu_item_id: item.id,
                portion: PortionSize::HalfPan,
            },
            quantity: 2,
        });
    }
    match service.cart_quote(&selections, Some(now + Duration::days(7)), now) {
        Ok(quote) => {
            for line in &quote.items {
                println!(
                    "- {} x{} at ${} ({} servings each)",
                    line.name, line.quantity, line.unit_price, line.servings
                );
            }
            println!("  {} servings in total", quote.total_servings);
            render_pricing(&quote.pricing, quote.tax_rate, service.pricing_config());
        }
        Err(err) => println!("  Cart rejected: {err}"),
    }

    println!("\nPlacing orders");
    let planned = match service.place_order(
        &team,
        demo_request(&first, now + Duration::days(7)),
        now,
    ) {
        Ok(order) => order,
        Err(err) => {
            println!("  Order rejected: {err}");
            return Ok(());
        }
    };
    let rushed = match service.place_order(
        &team,
        demo_request(&second, now + Duration::hours(36)),
        now,
    ) {
        Ok(order) => order,
        Err(err) => {
            println!("  Order rejected: {err}");
            return Ok(());
        }
    };
    for order in [&planned, &rushed] {
        println!(
            "- {} ({}) for {} people -> total ${} | rush surcharge ${}{}",
            order.order_number,
            order.items[0].template_name,
            order.estimated_people_count,
            order.total_amount,
            order.rush_surcharge,
            if order.is_rush_order { " [RUSH]" } else { "" }
        );
    }

    println!("\nAdmin confirms both orders");
    for order in [&planned, &rushed] {
        if let Err(err) = service.update_status(&admin, &order.id, OrderStatus::Confirmed) {
            println!("  Status update failed: {err}");
            return Ok(());
        }
    }

    println!("\nTeam asks to cancel");
    for order in [&rushed, &planned] {
        match service.cancel(&team, &order.id, now) {
            Ok(cancelled) => println!(
                "- {} -> {}",
                cancelled.order_number,
                cancelled.status.label()
            ),
            Err(err) => println!("- {} -> refused: {err}", order.order_number),
        }
    }

    println!("\nDelivering the rush order");
    for status in [OrderStatus::Preparing, OrderStatus::Delivered] {
        if let Err(err) = service.update_status(&admin, &rushed.id, status) {
            println!("  Status update failed: {err}");
            return Ok(());
        }
    }

    let report = match service.analytics(&admin, 30, now + Duration::days(2)) {
        Ok(report) => report,
        Err(err) => {
            println!("  Analytics unavailable: {err}");
            return Ok(());
        }
    };
    println!("\nAnalytics (last {} days)", report.window_days);
    println!(
        "- revenue ${} across {} delivered orders | average ${}",
        report.total_revenue, report.total_orders, report.average_order_value
    );
    println!(
        "- {} active teams | {} rush orders",
        report.active_teams, report.rush_orders
    );
    for template in &report.top_templates {
        println!(
            "  - {}: {} orders | ${}",
            template.name, template.orders, template.revenue
        );
    }
    println!("\nTeams");
    match service.teams_overview(&admin) {
        Ok(teams) => {
            for team in teams {
                println!(
                    "- {}: {} orders ({} open, {} delivered) | spent ${}",
                    team.team_id,
                    team.orders_placed,
                    team.open_orders,
                    team.delivered_orders,
                    team.total_spent
                );
            }
        }
        Err(err) => println!("  Teams overview unavailable: {err}"),
    }

    println!("\nAdmin retires {}", first);
    match service.set_template_active(&admin, &first, false) {
        Ok(template) => {
            let refused = service.place_order(
                &team,
                demo_request(&template.id, now + Duration::days(9)),
                now,
            );
            if let Err(err) = refused {
                println!("- new order refused: {err}");
            }
        }
        Err(err) => println!("  Template update failed: {err}"),
    }

    match serde_json::to_string_pretty(&report.recent_orders) {
        Ok(json) => println!("Recent orders payload:\n{json}"),
        Err(err) => println!("Recent orders payload unavailable: {err}"),
    }

    Ok(())
}

fn demo_request(template_id: &TemplateId, delivery_at: DateTime<Utc>) -> OrderRequest {
    OrderRequest {
        template_id: template_id.clone(),
        contact: ContactDetails {
            name: "Team Nutritionist".to_string(),
            phone: "555-0100".to_string(),
            email: "nutrition@team.example".to_string(),
        },
        delivery: DeliveryDetails {
            date: delivery_at.date_naive(),
            time: Some(delivery_at.time()),
            location: "Training facility".to_string(),
            instructions: None,
        },
        estimated_people_count: None,
        special_instructions: None,
    }
}

fn render_pricing(result: &PricingResult, tax_rate: Decimal, pricing: &PricingConfig) {
    println!("- Subtotal:       ${}", result.subtotal);
    println!(
        "- Tax ({}%):    ${}",
        (tax_rate * Decimal::ONE_HUNDRED).normalize(),
        result.tax_amount
    );
    if result.is_rush_order {
        println!(
            "- Rush surcharge: ${} (delivery inside {}h)",
            result.rush_surcharge, pricing.rush_threshold_hours
        );
    }
    println!("- Total:          ${}", result.total);
}

fn render_catalog(catalog: &MenuCatalog) {
    let active = catalog.active();
    println!("Menu templates ({} active)", active.len());
    for template in active {
        println!(
            "- {} [{}] ${} per person, serves {}",
            template.name, template.cuisine_type, template.bundle_price, template.serves_count
        );
    }
}

fn render_menu_items(catalog: &MenuCatalog) {
    for category in SectionCategory::ALL {
        let items = catalog.menu_items(&MenuItemFilter {
            category: Some(category),
            ..MenuItemFilter::default()
        });
        if items.is_empty() {
            continue;
        }
        println!("\n{} ({})", category.label(), items.len());
        for item in items {
            let tags = if item.dietary_tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", item.dietary_tags.join(", "))
            };
            println!(
                "- {}: ${} pp | ${} half pan | ${} full pan{}",
                item.name, item.price_per_person, item.price_half_pan, item.price_full_pan, tags
            );
        }
    }
}
