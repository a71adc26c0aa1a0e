use crate::domain::model::{EmailMetadata, NotificationMessage, SpeedingViolation, VehicleInfo};
use crate::utils::error::{FineError, Result};
use std::fmt::Write;

const DATE_FORMAT: &str = "%B, %d %Y";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Date and time of the violation, e.g. `("May, 01 2024", "14:30:00")`.
fn render_moment(violation: &SpeedingViolation) -> Result<(String, String)> {
    let mut date = String::new();
    write!(date, "{}", violation.timestamp.format(DATE_FORMAT))
        .map_err(|_| FineError::formatting("cannot render violation date"))?;

    let mut time = String::new();
    write!(time, "{}", violation.timestamp.format(TIME_FORMAT))
        .map_err(|_| FineError::formatting("cannot render violation time"))?;

    Ok((date, time))
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FineError::formatting(format!("{} is missing", field)));
    }
    Ok(())
}

fn check_fields(violation: &SpeedingViolation, vehicle: &VehicleInfo, fine_text: &str) -> Result<()> {
    require("license number", &violation.license_number)?;
    require("road id", &violation.road_id)?;
    require("owner name", &vehicle.owner_name)?;
    require("fine", fine_text)
}

pub fn render_notification_body(
    violation: &SpeedingViolation,
    vehicle: &VehicleInfo,
    fine_text: &str,
) -> Result<String> {
    check_fields(violation, vehicle, fine_text)?;
    let (date, time) = render_moment(violation)?;

    Ok(format!(
        "Dear {owner},\n\
         \n\
         The vehicle with license number {license}, registered in your name, was detected \
         driving {excess} km/h over the speed limit on the {road} road on {date} at {time}.\n\
         \n\
         Fine: {fine}.\n\
         \n\
         Please pay the fine within 14 days, quoting license number {license}. \
         If the fine is to be decided by the prosecutor, you will receive a separate summons.\n\
         \n\
         Central Fine Collection Agency\n",
        owner = vehicle.owner_name,
        license = violation.license_number,
        excess = violation.excess_speed,
        road = violation.road_id,
        date = date,
        time = time,
        fine = fine_text,
    ))
}

pub fn render_audit_line(
    violation: &SpeedingViolation,
    vehicle: &VehicleInfo,
    fine_text: &str,
) -> Result<String> {
    check_fields(violation, vehicle, fine_text)?;
    let (date, time) = render_moment(violation)?;

    Ok(format!(
        "Sent fine notification\n\
         \t\t\tTo {}, registered owner of license number {}.\n\
         \t\t\tViolation of {} km/h detected on the {} road on {} at {}.\n\
         \t\t\tFine: {}.\n\n",
        vehicle.owner_name,
        violation.license_number,
        violation.excess_speed,
        violation.road_id,
        date,
        time,
        fine_text,
    ))
}

pub fn render_subject(violation: &SpeedingViolation) -> String {
    format!("Speeding violation on the {}", violation.road_id)
}

pub fn render_notification(
    violation: &SpeedingViolation,
    vehicle: &VehicleInfo,
    fine_text: &str,
    email_from: &str,
) -> Result<NotificationMessage> {
    require("owner e-mail", &vehicle.owner_email)?;
    let body = render_notification_body(violation, vehicle, fine_text)?;

    Ok(NotificationMessage {
        body,
        metadata: EmailMetadata {
            email_from: email_from.to_string(),
            email_to: vehicle.owner_email.clone(),
            subject: render_subject(violation),
        },
    })
}
