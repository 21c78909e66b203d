//! Booking commands.

use anyhow::{anyhow, bail, Context as _, Result};
use chrono::{Local, Utc};
use dialoguer::Confirm;
use storefront_api::bookings;
use storefront_commerce::booking::BookingStatus;
use storefront_commerce::ids::{BookingId, StaffId};

use super::{parse_date, BookingsArgs, BookingsCommand};
use crate::context::Context;
use crate::output::status_badge;

/// Run the bookings command.
pub async fn run(args: BookingsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        BookingsCommand::Slots {
            date,
            duration,
            staff,
        } => slots(date, duration, staff, ctx).await,
        BookingsCommand::List { status, upcoming } => {
            let status = status
                .map(|s| s.parse::<BookingStatus>().map_err(|e| anyhow!(e)))
                .transpose()?;
            list(status, upcoming, ctx).await
        }
        BookingsCommand::Cancel { id, yes } => cancel(&BookingId::new(id), yes, ctx).await,
    }
}

async fn slots(date: Option<String>, duration: u32, staff: Option<String>, ctx: &Context) -> Result<()> {
    if duration == 0 {
        bail!("Duration must be at least one minute");
    }
    let date = match date {
        Some(date) => parse_date(&date)?,
        None => Local::now().date_naive(),
    };
    let staff = staff.map(StaffId::new);

    let client = ctx.client()?;
    let slots = bookings::get_time_slots(&client, date, duration, staff.as_ref())
        .await
        .context("Failed to load time slots")?;

    if ctx.output.is_json() {
        ctx.output.json(&slots);
        return Ok(());
    }

    ctx.output
        .header(&format!("Time slots on {} ({} min)", date, duration));
    let open: Vec<_> = slots.iter().filter(|s| s.available).collect();
    if open.is_empty() {
        ctx.output.info("No available slots.");
        return Ok(());
    }
    for slot in open {
        match &slot.staff_name {
            Some(name) => ctx.output.list_item(&format!("{} with {}", slot.time, name)),
            None => ctx.output.list_item(&slot.time),
        }
    }
    Ok(())
}

async fn list(status: Option<BookingStatus>, upcoming: bool, ctx: &Context) -> Result<()> {
    let state = ctx.app_state().await?;
    let email = state
        .auth()
        .await
        .customer
        .and_then(|c| c.contact_email().map(str::to_string));
    let Some(email) = email else {
        bail!("Sign in with an account that has an email to see bookings");
    };

    let mut bookings = bookings::get_customer_bookings(state.client(), &email, status)
        .await
        .context("Failed to load bookings")?;
    if upcoming {
        let now = Utc::now();
        bookings.retain(|b| b.is_upcoming(now));
    }
    bookings.sort_by_key(|b| b.start_time);

    if ctx.output.is_json() {
        ctx.output.json(&bookings);
        return Ok(());
    }

    if bookings.is_empty() {
        ctx.output.info("No bookings found.");
        return Ok(());
    }

    ctx.output.header(&format!("Bookings ({})", bookings.len()));
    let widths = [26, 18, 24, 10];
    ctx.output
        .table_row(&["ID", "WHEN", "SERVICE", "STATUS"], &widths);
    for booking in &bookings {
        let when = booking
            .start_time
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        let status = status_badge(booking.status.as_str());
        ctx.output.table_row(
            &[booking.id.as_str(), when.as_str(), booking.service_name.as_str(), status.as_str()],
            &widths,
        );
    }
    Ok(())
}

async fn cancel(id: &BookingId, yes: bool, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let booking = bookings::get_booking_by_id(&client, id)
        .await
        .with_context(|| format!("Failed to load booking {}", id))?;

    if !booking.status.is_cancellable() {
        bail!("Booking {} is {} and can no longer be cancelled", id, booking.status);
    }

    if !yes && !ctx.output.is_json() {
        let when = booking.start_time.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        let confirmed = Confirm::new()
            .with_prompt(format!("Cancel {} on {}?", booking.service_name, when))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Booking kept");
            return Ok(());
        }
    }

    let booking = bookings::cancel_booking(&client, id)
        .await
        .context("Failed to cancel booking")?;

    if ctx.output.is_json() {
        ctx.output.json(&booking);
        return Ok(());
    }
    ctx.output.success(&format!("Booking {} cancelled", booking.id));
    Ok(())
}
