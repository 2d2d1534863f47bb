//! Demo data for every console collection.
//!
//! `opsdesk seed` loads these into an empty database, and tests use them as
//! realistic snapshots.

use jiff::Timestamp;
use jiff::civil::date;
use jiff::tz::TimeZone;

use crate::model::*;
use crate::source::MemorySource;

/// Midnight UTC on the given day.
fn day((y, m, d): (i16, i8, i8)) -> Timestamp {
    date(y, m, d)
        .to_zoned(TimeZone::UTC)
        .map_or(Timestamp::UNIX_EPOCH, |z| z.timestamp())
}

pub fn appointments() -> Vec<Appointment> {
    use AppointmentStatus::{Cancelled, Completed, Confirmed, Pending};

    [
        ("John Smith", "Plumbing Repair", (2024, 12, 15, 10), Confirmed, 500, (2024, 12, 1)),
        ("Sarah Johnson", "Electrical Installation", (2024, 12, 16, 14), Confirmed, 2500, (2024, 12, 2)),
        ("Mike Wilson", "AC Maintenance", (2024, 12, 17, 9), Pending, 800, (2024, 12, 3)),
        ("Emma Davis", "Pest Control", (2024, 12, 10, 15), Completed, 1200, (2024, 11, 28)),
        ("Alex Brown", "Wall Painting", (2024, 12, 20, 8), Cancelled, 1500, (2024, 12, 5)),
        ("Lisa Anderson", "Carpet Cleaning", (2024, 12, 18, 11), Confirmed, 600, (2024, 12, 4)),
        ("David Martinez", "Water Tank Cleaning", (2024, 12, 19, 13), Pending, 900, (2024, 12, 6)),
        ("Jennifer Garcia", "Door Installation", (2024, 12, 21, 10), Confirmed, 2000, (2024, 12, 7)),
        ("John Smith", "Garden Landscaping", (2024, 12, 22, 14), Completed, 3000, (2024, 11, 30)),
        ("Sarah Johnson", "Window Repair", (2024, 12, 23, 16), Pending, 700, (2024, 12, 8)),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (who, service, (y, m, d, h), status, pesos, created))| Appointment {
        id: format!("APT-{:03}", i + 1),
        customer_name: who.into(),
        service_name: service.into(),
        provider: who.into(),
        scheduled_at: date(y, m, d).at(h, 0, 0, 0),
        amount: Amount::from_pesos(pesos),
        status,
        timestamps: Timestamps::new(day(created)),
    })
    .collect()
}

pub fn services() -> Vec<ServiceListing> {
    use ServiceStatus::{Active, Inactive, Pending};

    [
        ("Plumbing Repair", "Maintenance", "Fix leaks and pipe issues", 500, "John Smith", "Plumber", 4.8, Active, (2024, 1, 15)),
        ("Electrical Installation", "Installation", "Home electrical wiring setup", 2500, "Sarah Johnson", "Electrician", 4.9, Active, (2024, 2, 20)),
        ("AC Maintenance", "Maintenance", "Air conditioning system check and cleaning", 800, "Mike Wilson", "HVAC Technician", 4.6, Active, (2023, 12, 10)),
        ("Pest Control", "Cleaning", "Professional pest removal service", 1200, "Emma Davis", "Cleaner", 4.7, Active, (2024, 3, 5)),
        ("Wall Painting", "Painting", "Interior and exterior wall painting", 1500, "Alex Brown", "Painter", 4.5, Pending, (2024, 4, 1)),
        ("Carpet Cleaning", "Cleaning", "Professional carpet and upholstery cleaning", 600, "Lisa Anderson", "Cleaner", 4.8, Active, (2024, 1, 22)),
        ("Water Tank Cleaning", "Maintenance", "Deep cleaning of water tanks", 900, "David Martinez", "Maintenance Worker", 4.9, Active, (2024, 2, 14)),
        ("Door Installation", "Installation", "Install new doors and frames", 2000, "Jennifer Garcia", "Carpenter", 4.4, Inactive, (2023, 11, 30)),
        ("Garden Landscaping", "Gardening", "Professional garden design and maintenance", 3000, "John Smith", "Gardener", 4.9, Active, (2024, 3, 15)),
        ("Window Repair", "Maintenance", "Fix broken windows and frames", 700, "Sarah Johnson", "Electrician", 4.7, Active, (2024, 2, 28)),
    ]
    .into_iter()
    .enumerate()
    .map(
        |(i, (name, category, description, pesos, provider, provider_category, rating, status, created))| {
            ServiceListing {
                id: format!("SVC-{:03}", i + 1),
                name: name.into(),
                category: category.into(),
                description: description.into(),
                base_price: Amount::from_pesos(pesos),
                provider: provider.into(),
                provider_category: provider_category.into(),
                rating,
                status,
                timestamps: Timestamps::new(day(created)),
            }
        },
    )
    .collect()
}

pub fn products() -> Vec<Product> {
    use ProductStatus::{Available, Discontinued, OutOfStock};

    [
        ("Power Drill", "Tools", 1500, 45, "BuildCo", Available, (2024, 1, 10)),
        ("Hammer Set", "Tools", 800, 120, "ToolMaster", Available, (2024, 1, 15)),
        ("PVC Pipes", "Plumbing", 2000, 0, "PlumbTech", OutOfStock, (2024, 2, 1)),
        ("Electrical Wire", "Electrical", 3500, 85, "ElectroSupply", Available, (2024, 2, 5)),
        ("Paint Brush Set", "Painting", 950, 200, "ArtPro", Available, (2024, 2, 10)),
        ("Cement Bags", "Materials", 400, 500, "CementCo", Available, (2024, 2, 15)),
        ("Saw Blades", "Tools", 1200, 0, "CutMaster", OutOfStock, (2024, 3, 1)),
        ("Screwdriver Set", "Tools", 600, 150, "ToolMaster", Available, (2024, 3, 5)),
        ("LED Lights", "Electrical", 2500, 30, "LightBright", Available, (2024, 3, 10)),
        ("Wood Stain", "Painting", 1100, 0, "ArtPro", Discontinued, (2024, 1, 20)),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, category, pesos, stock, seller, status, created))| Product {
        id: format!("PRD-{:03}", i + 1),
        name: name.into(),
        category: category.into(),
        price: Amount::from_pesos(pesos),
        stock,
        seller: seller.into(),
        status,
        timestamps: Timestamps::new(day(created)),
    })
    .collect()
}

pub fn orders() -> Vec<Order> {
    use OrderStatus::{Cancelled, Delivered, ForDelivery, Pending, Processing};

    [
        ("John Smith", "BuildCo", 2500, "123 Main St, Manila", Delivered, (2024, 12, 1), (2024, 12, 5)),
        ("Sarah Johnson", "ToolMaster", 5200, "456 Oak Ave, Cebu", ForDelivery, (2024, 12, 3), (2024, 12, 8)),
        ("Mike Wilson", "PlumbTech", 1800, "789 Pine Rd, Davao", Processing, (2024, 12, 5), (2024, 12, 6)),
        ("Emma Davis", "ElectroSupply", 3600, "321 Elm St, Quezon City", Pending, (2024, 12, 7), (2024, 12, 7)),
        ("Alex Brown", "ArtPro", 2100, "654 Maple Dr, Makati", Delivered, (2024, 11, 28), (2024, 12, 2)),
        ("Lisa Anderson", "CementCo", 4500, "987 Cedar Ln, Pasig", ForDelivery, (2024, 12, 4), (2024, 12, 9)),
        ("David Martinez", "CutMaster", 1200, "456 Birch St, Taguig", Cancelled, (2024, 12, 2), (2024, 12, 3)),
        ("Jennifer Garcia", "LightBright", 6800, "789 Walnut Ave, Cavite", Processing, (2024, 12, 6), (2024, 12, 7)),
        ("Robert Taylor", "BuildCo", 3300, "123 Spruce St, Las Piñas", Pending, (2024, 12, 8), (2024, 12, 8)),
        ("Michelle Lee", "ToolMaster", 5100, "654 Ash Rd, Parañaque", Delivered, (2024, 11, 25), (2024, 12, 1)),
    ]
    .into_iter()
    .enumerate()
    .map(
        |(i, (buyer, seller, pesos, address, status, created, updated))| Order {
            id: format!("ORD-2024-{:03}", i + 1),
            buyer_id: format!("USR-{:03}", i + 1),
            buyer_name: buyer.into(),
            seller_id: format!("USR-{}", 101 + i),
            seller_name: seller.into(),
            total_amount: Amount::from_pesos(pesos),
            delivery_address: address.into(),
            payment_id: format!("PAY-{:03}", i + 1),
            status,
            timestamps: Timestamps {
                created_at: day(created),
                updated_at: day(updated),
            },
        },
    )
    .collect()
}

pub fn drones() -> Vec<Drone> {
    use DroneStatus::{Active, Delivering, Inactive, Maintenance};

    [
        ("Sky Courier 1", "DC-5000", Delivering, 75_u8, 5.0, (2024, 11, 15), (2024, 1, 10)),
        ("Sky Courier 2", "DC-500", Active, 88, 3.0, (2024, 10, 20), (2024, 1, 15)),
        ("Swift Delivery", "DC-400", Maintenance, 45, 2.5, (2024, 12, 1), (2024, 2, 5)),
        ("Express Air", "DC-600", Active, 92, 8.0, (2024, 11, 10), (2024, 3, 1)),
        ("Horizon Alpha", "DC-500", Inactive, 30, 3.0, (2024, 8, 15), (2024, 4, 12)),
        ("Thunder Wings", "DC-400", Active, 85, 2.5, (2024, 11, 20), (2024, 2, 20)),
        ("Velocity Pro", "DC-600", Active, 98, 8.0, (2024, 11, 25), (2024, 5, 10)),
        ("Cloud Runner", "DC-500", Maintenance, 55, 3.0, (2024, 12, 5), (2024, 3, 18)),
    ]
    .into_iter()
    .enumerate()
    .map(
        |(i, (name, model, status, battery, capacity, (my, mm, md), registered))| Drone {
            id: format!("DRN-{:03}", i + 1),
            name: name.into(),
            model: model.into(),
            serial_number: format!("SN-{:03}", i + 1),
            battery_health: BatteryHealth::try_from(battery).unwrap_or(BatteryHealth::FULL),
            load_capacity: capacity,
            last_maintenance: Some(date(my, mm, md)),
            registered_on: date(registered.0, registered.1, registered.2),
            status,
            timestamps: Timestamps::new(day(registered)),
        },
    )
    .collect()
}

/// Every fixture collection as an in-memory record source.
pub fn source() -> serde_json::Result<MemorySource> {
    let mut source = MemorySource::new();
    source.extend(&appointments())?;
    source.extend(&services())?;
    source.extend(&products())?;
    source.extend(&orders())?;
    source.extend(&drones())?;
    Ok(source)
}
