use super::domain::{Order, OrderStatus, TeamId, TemplateId};
use super::pricing::round_money;
use super::repository::OrderSummaryView;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const TOP_TEMPLATE_LIMIT: usize = 5;
const RECENT_ORDER_LIMIT: usize = 10;
const MONTHLY_BUCKETS: i32 = 6;

/// Admin dashboard figures over a trailing window of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    pub window_days: u32,
    pub generated_at: DateTime<Utc>,
    pub total_revenue: Decimal,
    pub total_orders: usize,
    pub average_order_value: Decimal,
    pub active_teams: usize,
    pub rush_orders: usize,
    pub top_templates: Vec<TemplatePerformance>,
    pub recent_orders: Vec<OrderSummaryView>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplatePerformance {
    pub template_id: TemplateId,
    pub name: String,
    pub orders: usize,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: Decimal,
    pub orders: usize,
}

/// Per-team roll-up for the admin teams page. Spend and the delivered count
/// use delivered orders; `orders_placed` and `open_orders` cover every status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamOverview {
    pub team_id: TeamId,
    pub orders_placed: usize,
    pub open_orders: usize,
    pub delivered_orders: usize,
    pub total_spent: Decimal,
    pub last_delivered_order_at: Option<DateTime<Utc>>,
}

impl TeamOverview {
    /// One row per team that has placed an order, ordered by team id.
    pub fn build(orders: &[Order]) -> Vec<Self> {
        let mut by_team: BTreeMap<&TeamId, TeamOverview> = BTreeMap::new();
        for order in orders {
            let entry = by_team
                .entry(&order.team_id)
                .or_insert_with(|| TeamOverview {
                    team_id: order.team_id.clone(),
                    orders_placed: 0,
                    open_orders: 0,
                    delivered_orders: 0,
                    total_spent: Decimal::ZERO,
                    last_delivered_order_at: None,
                });

            entry.orders_placed += 1;
            if !order.status.is_terminal() {
                entry.open_orders += 1;
            }
            if order.status == OrderStatus::Delivered {
                entry.delivered_orders += 1;
                entry.total_spent = entry.total_spent.saturating_add(order.total_amount);
                entry.last_delivered_order_at =
                    entry.last_delivered_order_at.max(Some(order.created_at));
            }
        }

        by_team
            .into_values()
            .map(|mut overview| {
                overview.total_spent = round_money(overview.total_spent);
                overview
            })
            .collect()
    }
}

impl AnalyticsReport {
    /// Revenue figures count delivered orders only; activity counts
    /// (teams, rush orders, recent orders) cover every status.
    pub fn build(orders: &[Order], window_days: u32, now: DateTime<Utc>) -> Self {
        let since = window_start(now, window_days);
        let mut in_window: Vec<&Order> = orders
            .iter()
            .filter(|order| order.created_at >= since)
            .collect();
        in_window.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let delivered: Vec<&Order> = in_window
            .iter()
            .copied()
            .filter(|order| order.status == OrderStatus::Delivered)
            .collect();

        let total_revenue =
            round_money(money_sum(delivered.iter().map(|order| order.total_amount)));
        let total_orders = delivered.len();
        let average_order_value = if total_orders > 0 {
            round_money(total_revenue / Decimal::from(total_orders as u64))
        } else {
            round_money(Decimal::ZERO)
        };

        let active_teams = in_window
            .iter()
            .map(|order| &order.team_id)
            .collect::<BTreeSet<&TeamId>>()
            .len();
        let rush_orders = in_window.iter().filter(|order| order.is_rush_order).count();

        let recent_orders = in_window
            .iter()
            .take(RECENT_ORDER_LIMIT)
            .map(|order| order.summary_view())
            .collect();

        Self {
            window_days,
            generated_at: now,
            total_revenue,
            total_orders,
            average_order_value,
            active_teams,
            rush_orders,
            top_templates: top_templates(&delivered),
            recent_orders,
            monthly_revenue: monthly_revenue(&delivered, now),
        }
    }
}

fn top_templates(delivered: &[&Order]) -> Vec<TemplatePerformance> {
    let mut by_template: BTreeMap<&TemplateId, TemplatePerformance> = BTreeMap::new();
    for item in delivered.iter().flat_map(|order| order.items.iter()) {
        let entry = by_template
            .entry(&item.template_id)
            .or_insert_with(|| TemplatePerformance {
                template_id: item.template_id.clone(),
                name: item.template_name.clone(),
                orders: 0,
                revenue: Decimal::ZERO,
            });
        entry.orders += 1;
        entry.revenue = entry.revenue.saturating_add(item.total_price);
    }

    let mut ranked: Vec<TemplatePerformance> = by_template
        .into_values()
        .map(|mut performance| {
            performance.revenue = round_money(performance.revenue);
            performance
        })
        .collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(TOP_TEMPLATE_LIMIT);
    ranked
}

fn monthly_revenue(delivered: &[&Order], now: DateTime<Utc>) -> Vec<MonthlyRevenue> {
    let current = now.year() * 12 + now.month0() as i32;

    (0..MONTHLY_BUCKETS)
        .rev()
        .filter_map(|offset| {
            let start = month_start(current - offset)?;
            let end = month_start(current - offset + 1)?;
            let in_month: Vec<&&Order> = delivered
                .iter()
                .filter(|order| {
                    let created = order.created_at.date_naive();
                    created >= start && created < end
                })
                .collect();

            Some(MonthlyRevenue {
                month: start.format("%b %Y").to_string(),
                revenue: round_money(money_sum(in_month.iter().map(|order| order.total_amount))),
                orders: in_month.len(),
            })
        })
        .collect()
}

/// Windows reaching past the earliest representable instant cover everything.
fn window_start(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(window_days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn money_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn month_start(month_index: i32) -> Option<NaiveDate> {
    let year = month_index.div_euclid(12);
    let month = month_index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::domain::{ContactDetails, DeliveryDetails, OrderId, OrderItem};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    fn order(
        id: &str,
        team: &str,
        template: (&str, &str),
        status: OrderStatus,
        total: Decimal,
        days_ago: i64,
    ) -> Order {
        let created_at = now() - Duration::days(days_ago);
        Order {
            id: OrderId(id.to_string()),
            order_number: format!("AL-{id}"),
            team_id: TeamId(team.to_string()),
            status,
            contact: ContactDetails {
                name: "Sam Rivera".to_string(),
                phone: "555-0100".to_string(),
                email: "sam@example.com".to_string(),
            },
            delivery: DeliveryDetails {
                date: created_at.date_naive() + Duration::days(5),
                time: None,
                location: "Arena loading dock".to_string(),
                instructions: None,
            },
            estimated_people_count: 10,
            subtotal_amount: total,
            tax_rate: dec!(0),
            tax_amount: dec!(0),
            rush_surcharge: dec!(0),
            total_amount: total,
            is_rush_order: id.ends_with('r'),
            created_at,
            items: vec![OrderItem {
                template_id: TemplateId(template.0.to_string()),
                template_name: template.1.to_string(),
                quantity: 1,
                unit_price: total,
                total_price: total,
                special_instructions: None,
            }],
        }
    }

    #[test]
    fn revenue_counts_delivered_orders_only() {
        let orders = vec![
            order("1", "hawks", ("med", "Med Bowl"), OrderStatus::Delivered, dec!(100.00), 1),
            order("2", "hawks", ("med", "Med Bowl"), OrderStatus::Delivered, dec!(50.00), 3),
            order("3r", "owls", ("grill", "Grill"), OrderStatus::Pending, dec!(900.00), 2),
            order("4", "owls", ("grill", "Grill"), OrderStatus::Delivered, dec!(75.00), 45),
        ];

        let report = AnalyticsReport::build(&orders, 30, now());

        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_revenue, dec!(150.00));
        assert_eq!(report.average_order_value, dec!(75.00));
        assert_eq!(report.active_teams, 2);
        assert_eq!(report.rush_orders, 1);
        assert_eq!(report.recent_orders.len(), 3);
        assert_eq!(report.recent_orders[0].id, OrderId("1".to_string()));

        assert_eq!(report.top_templates.len(), 1);
        assert_eq!(report.top_templates[0].name, "Med Bowl");
        assert_eq!(report.top_templates[0].orders, 2);
        assert_eq!(report.top_templates[0].revenue, dec!(150.00));
    }

    #[test]
    fn empty_window_reports_zeroes() {
        let report = AnalyticsReport::build(&[], 7, now());
        assert_eq!(report.total_revenue, dec!(0.00));
        assert_eq!(report.average_order_value, dec!(0.00));
        assert!(report.top_templates.is_empty());
        assert_eq!(report.monthly_revenue.len(), 6);
        assert!(report.monthly_revenue.iter().all(|month| month.orders == 0));
    }

    #[test]
    fn monthly_buckets_end_with_current_month() {
        let orders = vec![
            order("1", "hawks", ("med", "Med Bowl"), OrderStatus::Delivered, dec!(10.00), 1),
            order("2", "hawks", ("med", "Med Bowl"), OrderStatus::Delivered, dec!(20.00), 20),
            order("3", "hawks", ("med", "Med Bowl"), OrderStatus::Delivered, dec!(40.00), 50),
        ];

        let report = AnalyticsReport::build(&orders, 180, now());
        let labels: Vec<_> = report
            .monthly_revenue
            .iter()
            .map(|month| month.month.as_str())
            .collect();
        assert_eq!(
            labels,
            ["Oct 2025", "Nov 2025", "Dec 2025", "Jan 2026", "Feb 2026", "Mar 2026"]
        );

        let march = report.monthly_revenue.last().expect("current month");
        assert_eq!(march.orders, 1);
        assert_eq!(march.revenue, dec!(10.00));
        let february = &report.monthly_revenue[4];
        assert_eq!(february.orders, 1);
        assert_eq!(february.revenue, dec!(20.00));
        let january = &report.monthly_revenue[3];
        assert_eq!(january.revenue, dec!(40.00));
    }

    #[test]
    fn huge_windows_cover_all_history() {
        let orders = vec![order(
            "1",
            "hawks",
            ("med", "Med Bowl"),
            OrderStatus::Delivered,
            dec!(10.00),
            4000,
        )];

        let report = AnalyticsReport::build(&orders, u32::MAX, now());
        assert_eq!(report.window_days, u32::MAX);
        assert_eq!(report.total_orders, 1);

        let empty = AnalyticsReport::build(&[], 4_000_000_000, now());
        assert_eq!(empty.total_orders, 0);
    }

    #[test]
    fn team_overview_rolls_up_per_team() {
        let orders = vec![
            order("1", "hawks", ("med", "Med Bowl"), OrderStatus::Delivered, dec!(100.00), 1),
            order("2", "hawks", ("med", "Med Bowl"), OrderStatus::Delivered, dec!(50.25), 9),
            order("3", "hawks", ("med", "Med Bowl"), OrderStatus::Confirmed, dec!(80.00), 0),
            order("4", "owls", ("grill", "Grill"), OrderStatus::Cancelled, dec!(75.00), 3),
        ];

        let overview = TeamOverview::build(&orders);
        assert_eq!(overview.len(), 2);

        let hawks = &overview[0];
        assert_eq!(hawks.team_id, TeamId("hawks".to_string()));
        assert_eq!(hawks.orders_placed, 3);
        assert_eq!(hawks.open_orders, 1);
        assert_eq!(hawks.delivered_orders, 2);
        assert_eq!(hawks.total_spent, dec!(150.25));
        assert_eq!(hawks.last_delivered_order_at, Some(now() - Duration::days(1)));

        let owls = &overview[1];
        assert_eq!(owls.orders_placed, 1);
        assert_eq!(owls.open_orders, 0);
        assert_eq!(owls.delivered_orders, 0);
        assert_eq!(owls.total_spent, dec!(0.00));
        assert!(owls.last_delivered_order_at.is_none());
    }

    #[test]
    fn top_templates_are_capped_and_ranked() {
        let orders: Vec<Order> = (0..7)
            .map(|index| {
                order(
                    &index.to_string(),
                    "hawks",
                    (&format!("tpl-{index}"), &format!("Bundle {index}")),
                    OrderStatus::Delivered,
                    Decimal::from(100 + index),
                    1,
                )
            })
            .collect();

        let report = AnalyticsReport::build(&orders, 30, now());
        assert_eq!(report.top_templates.len(), 5);
        assert_eq!(report.top_templates[0].name, "Bundle 6");
        assert_eq!(report.top_templates[4].name, "Bundle 2");
    }
}
