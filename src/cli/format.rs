//! Output formatting for CLI display.

use crate::model::{
    AdminLog, Appointment, Drone, Order, Payment, Product, ServiceListing,
};
use crate::query::QueryResult;

/// A record that can be shown as one table row.
pub(super) trait Row {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl Row for Appointment {
    const HEADERS: &'static [&'static str] =
        &["ID", "CUSTOMER", "SERVICE", "PROVIDER", "SCHEDULED", "AMOUNT", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.customer_name.clone(),
            self.service_name.clone(),
            self.provider.clone(),
            self.scheduled_at.strftime("%Y-%m-%d %H:%M").to_string(),
            self.amount.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Row for ServiceListing {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "CATEGORY", "PROVIDER", "PRICE", "RATING", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.category.clone(),
            format!("{} ({})", self.provider, self.provider_category),
            self.base_price.to_string(),
            format!("{:.1}", self.rating),
            self.status.to_string(),
        ]
    }
}

impl Row for Product {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "CATEGORY", "PRICE", "STOCK", "SELLER", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.category.clone(),
            self.price.to_string(),
            self.stock.to_string(),
            self.seller.clone(),
            self.status.to_string(),
        ]
    }
}

impl Row for Order {
    const HEADERS: &'static [&'static str] =
        &["ID", "BUYER", "SELLER", "TOTAL", "ADDRESS", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.buyer_name.clone(),
            self.seller_name.clone(),
            self.total_amount.to_string(),
            self.delivery_address.clone(),
            self.status.to_string(),
        ]
    }
}

impl Row for Drone {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "MODEL", "SERIAL", "BATTERY", "CAPACITY", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.model.clone(),
            self.serial_number.clone(),
            self.battery_health.to_string(),
            format!("{} kg", self.load_capacity),
            self.status.to_string(),
        ]
    }
}

impl Row for Payment {
    const HEADERS: &'static [&'static str] =
        &["REFERENCE", "USER", "AMOUNT", "METHOD", "STATUS", "CREATED", "ID"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.reference_number.clone(),
            self.user_id.clone(),
            self.amount.to_string(),
            self.method.to_string(),
            self.status.to_string(),
            self.timestamps.created_at.strftime("%Y-%m-%d %H:%M").to_string(),
            self.id.clone(),
        ]
    }
}

impl Row for AdminLog {
    const HEADERS: &'static [&'static str] = &["TIME", "ADMIN", "ACTION", "DETAILS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.created_at.strftime("%Y-%m-%d %H:%M:%S").to_string(),
            self.admin_id.clone(),
            self.action.clone(),
            self.details.clone().unwrap_or_default(),
        ]
    }
}

/// Left-aligned columns separated by two spaces, with a header line.
pub(super) fn format_table<R: Row>(rows: &[R]) -> String {
    let body: Vec<Vec<String>> = rows.iter().map(Row::cells).collect();

    let mut widths: Vec<usize> = R::HEADERS.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let headers: Vec<String> = R::HEADERS.iter().map(ToString::to_string).collect();
    std::iter::once(&headers)
        .chain(&body)
        .map(|cells| format_line(cells, &widths))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

/// Footer lines under a list: what is shown, where we are, and how much was filtered out.
pub(super) fn format_summary<T>(result: &QueryResult<T>, noun: &str) -> String {
    let showing = match result.showing() {
        Some((first, last)) => {
            format!("Showing {first} to {last} of {} {noun}", result.total_matches)
        }
        None => format!("No matching {noun}"),
    };
    format!(
        "{showing}\nPage {} of {}\nTotal {noun}: {} of {}",
        result.page.page_number,
        result.page.total_pages,
        result.total_matches,
        result.collection_len
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fixtures;
    use crate::query::{ListQueryEngine, QueryParams};

    #[test]
    fn table_columns_are_aligned() {
        let drones = &fixtures::drones()[..2];
        let table = format_table(drones);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID       NAME"));
        assert!(lines[1].starts_with("DRN-001  Sky Courier 1"));
        let model_col = lines[0].find("MODEL").unwrap();
        assert_eq!(&lines[1][model_col..model_col + 7], "DC-5000");
        assert_eq!(&lines[2][model_col..model_col + 6], "DC-500");
    }

    #[test]
    fn empty_table_is_just_headers() {
        let table = format_table::<Order>(&[]);
        assert_eq!(table, "ID  BUYER  SELLER  TOTAL  ADDRESS  STATUS");
    }

    #[test]
    fn summary_counts_the_visible_slice() {
        let appointments = fixtures::appointments();
        let result = ListQueryEngine::for_listing::<Appointment>()
            .query(&appointments, &QueryParams::default().page(2));

        assert_eq!(
            format_summary(&result, "appointments"),
            "Showing 6 to 10 of 10 appointments\nPage 2 of 2\nTotal appointments: 10 of 10"
        );
    }

    #[test]
    fn summary_without_matches() {
        let appointments = fixtures::appointments();
        let result = ListQueryEngine::for_listing::<Appointment>()
            .query(&appointments, &QueryParams::default().search("nobody"));

        assert_eq!(
            format_summary(&result, "appointments"),
            "No matching appointments\nPage 1 of 1\nTotal appointments: 0 of 10"
        );
    }

    #[test]
    fn log_row_leaves_missing_details_blank() {
        let entry = crate::audit::AuditDraft::new("admin-01", "drone.registered")
            .seal(jiff::Timestamp::UNIX_EPOCH);
        assert_eq!(
            entry.cells(),
            vec!["1970-01-01 00:00:00", "admin-01", "drone.registered", ""]
        );
    }
}
