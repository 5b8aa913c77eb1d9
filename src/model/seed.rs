use chrono::NaiveDate;

use super::garage::GarageData;
use super::mileage::MileageEntry;
use super::reminder::{Period, Reminder, Trigger};
use super::service::ServiceRecord;
use super::vehicle::Vehicle;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

#[allow(clippy::too_many_arguments)]
fn vehicle(
    id: &str,
    name: &str,
    make: &str,
    model: &str,
    year: i32,
    plate: &str,
    vin: &str,
    purchased: NaiveDate,
) -> Vehicle {
    Vehicle {
        id: id.into(),
        name: name.into(),
        make: make.into(),
        model: model.into(),
        year,
        license_plate: Some(plate.into()),
        vin: Some(vin.into()),
        purchase_date: Some(purchased),
    }
}

#[allow(clippy::too_many_arguments)]
fn service(
    id: &str,
    vehicle_id: &str,
    service: &str,
    date: NaiveDate,
    mileage: u32,
    cost: f64,
    shop: &str,
    notes: &str,
) -> ServiceRecord {
    ServiceRecord {
        id: id.into(),
        vehicle_id: vehicle_id.into(),
        service: service.into(),
        date,
        mileage,
        cost,
        shop: shop.into(),
        notes: notes.into(),
    }
}

fn odometer(id: &str, vehicle_id: &str, date: NaiveDate, mileage: u32) -> MileageEntry {
    MileageEntry {
        id: id.into(),
        vehicle_id: vehicle_id.into(),
        date,
        mileage,
    }
}

/// The demo garage every session starts with unless `--data` is given.
pub fn sample_data() -> GarageData {
    GarageData {
        vehicles: vec![
            vehicle(
                "1",
                "My Honda Civic",
                "Honda",
                "Civic",
                2019,
                "ABC-1234",
                "1HGCM82633A123456",
                date(2019, 6, 15),
            ),
            vehicle(
                "2",
                "Family SUV",
                "Toyota",
                "RAV4",
                2021,
                "XYZ-9876",
                "JTMRJREV0JD123456",
                date(2021, 3, 10),
            ),
        ],
        services: vec![
            service(
                "1",
                "1",
                "Oil Change",
                date(2023, 12, 15),
                42500,
                65.0,
                "Quick Lube",
                "Used synthetic oil. Replaced oil filter.",
            ),
            service(
                "2",
                "1",
                "Tire Rotation",
                date(2023, 10, 20),
                40000,
                30.0,
                "Discount Tire",
                "All tires in good condition. Pressure adjusted.",
            ),
            service(
                "3",
                "1",
                "Brake Inspection",
                date(2023, 8, 5),
                35000,
                120.0,
                "Auto Care Center",
                "Front brake pads replaced. Rotors in good condition.",
            ),
            service(
                "4",
                "2",
                "Oil Change",
                date(2023, 11, 10),
                25000,
                85.0,
                "Dealer Service",
                "Full synthetic oil change with premium filter.",
            ),
            service(
                "5",
                "2",
                "Tire Replacement",
                date(2023, 9, 15),
                22000,
                650.0,
                "Tire Center",
                "Replaced all four tires with all-season tires.",
            ),
        ],
        reminders: vec![
            Reminder {
                id: "1".into(),
                title: "Oil Change".into(),
                description: "Regular oil change with synthetic oil".into(),
                vehicle_id: Some("1".into()),
                trigger: Trigger::Mileage {
                    at: 48000,
                    every: Some(3000),
                },
                enabled: true,
            },
            Reminder {
                id: "2".into(),
                title: "Tire Rotation".into(),
                description: "Rotate tires for even wear".into(),
                vehicle_id: Some("1".into()),
                trigger: Trigger::Mileage {
                    at: 50000,
                    every: Some(5000),
                },
                enabled: true,
            },
            Reminder {
                id: "3".into(),
                title: "Annual Inspection".into(),
                description: "State vehicle inspection".into(),
                vehicle_id: None,
                trigger: Trigger::Date {
                    on: date(2024, 6, 15),
                    every: Some(Period::Year),
                },
                enabled: true,
            },
            Reminder {
                id: "4".into(),
                title: "Insurance Renewal".into(),
                description: "Car insurance policy renewal".into(),
                vehicle_id: None,
                trigger: Trigger::Date {
                    on: date(2024, 4, 10),
                    every: Some(Period::Year),
                },
                enabled: true,
            },
        ],
        mileage: vec![
            odometer("1", "1", date(2023, 7, 1), 38000),
            odometer("2", "1", date(2023, 8, 15), 40000),
            odometer("3", "1", date(2023, 10, 1), 42000),
            odometer("4", "1", date(2023, 11, 15), 43500),
            odometer("5", "1", date(2023, 12, 30), 45289),
            odometer("6", "2", date(2023, 11, 10), 25000),
        ],
    }
}
