//! Service booking endpoints.

use crate::query::{segment, Query};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use storefront_client::{ApiClient, ApiError};
use storefront_commerce::booking::{Booking, BookingStatus, TimeSlot};
use storefront_commerce::ids::{BookingId, StaffId};
use tracing::info;

const BOOKINGS: &str = "/api/bookings";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub service_name: String,
    pub start_time: DateTime<Utc>,
    /// Minutes.
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<StaffId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Slots on `date` for a service lasting `duration_minutes`.
pub async fn get_time_slots(
    client: &ApiClient,
    date: NaiveDate,
    duration_minutes: u32,
    staff_id: Option<&StaffId>,
) -> Result<Vec<TimeSlot>, ApiError> {
    let query = Query::new()
        .push("date", date)
        .push("duration", duration_minutes)
        .push_str("staffId", staff_id.map(StaffId::as_str));
    client
        .get(&query.to_path(&format!("{}/time-slots", BOOKINGS)), false)
        .await
}

pub async fn create_booking(
    client: &ApiClient,
    request: &CreateBookingRequest,
) -> Result<Booking, ApiError> {
    let booking: Booking = client.post(BOOKINGS, request, true).await?;
    info!(booking_id = %booking.id, start = %booking.start_time, "Booking created");
    Ok(booking)
}

/// Bookings of one customer, optionally narrowed to a status.
pub async fn get_customer_bookings(
    client: &ApiClient,
    customer_email: &str,
    status: Option<BookingStatus>,
) -> Result<Vec<Booking>, ApiError> {
    let query = Query::new()
        .push("customerEmail", customer_email)
        .push_opt("status", status.map(|s| s.as_str()));
    client.get(&query.to_path(BOOKINGS), true).await
}

pub async fn get_booking_by_id(client: &ApiClient, id: &BookingId) -> Result<Booking, ApiError> {
    client
        .get(&format!("{}/{}", BOOKINGS, segment(id.as_str())), true)
        .await
}

/// Reschedule, annotate, or change the status of a booking.
pub async fn update_booking(
    client: &ApiClient,
    id: &BookingId,
    update: &UpdateBookingRequest,
) -> Result<Booking, ApiError> {
    client
        .put(&format!("{}/{}", BOOKINGS, segment(id.as_str())), update, true)
        .await
}

pub async fn cancel_booking(client: &ApiClient, id: &BookingId) -> Result<Booking, ApiError> {
    let update = UpdateBookingRequest {
        status: Some(BookingStatus::Cancelled),
        ..UpdateBookingRequest::default()
    };
    let booking = update_booking(client, id, &update).await?;
    info!(booking_id = %id, "Booking cancelled");
    Ok(booking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::mock_client;
    use chrono::TimeZone;
    use serde_json::json;
    use storefront_client::Method;

    fn booking_json(status: &str) -> serde_json::Value {
        json!({
            "_id": "b1",
            "customerName": "Ada",
            "serviceName": "Haircut",
            "startTime": "2024-05-01T10:00:00Z",
            "endTime": "2024-05-01T10:30:00Z",
            "duration": 30,
            "status": status
        })
    }

    #[tokio::test]
    async fn test_time_slots_query_is_public() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(
            200,
            json!([{"time": "10:00", "available": true}, {"time": "10:30", "available": false}]),
        );

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let slots = get_time_slots(&client, date, 30, Some(&StaffId::new("s1")))
            .await
            .unwrap();

        assert_eq!(slots.len(), 2);
        assert!(slots[0].available);
        let sent = mock.last_request().unwrap();
        assert_eq!(
            sent.url,
            "https://shop.test/api/bookings/time-slots?date=2024-05-01&duration=30&staffId=s1"
        );
        assert!(sent.header_str("authorization").is_none());
    }

    #[tokio::test]
    async fn test_create_booking_body() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(201, booking_json("pending"));

        let request = CreateBookingRequest {
            customer_name: "Ada".into(),
            customer_email: "ada@x.io".into(),
            customer_phone: "1".into(),
            service_name: "Haircut".into(),
            start_time: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            duration: 30,
            staff_id: None,
            notes: None,
        };
        let booking = create_booking(&client, &request).await.unwrap();

        assert_eq!(booking.duration().num_minutes(), 30);
        let body = mock.last_request().unwrap().json_body().unwrap();
        assert_eq!(body["startTime"], json!("2024-05-01T10:00:00Z"));
        assert_eq!(body["duration"], json!(30));
        assert!(body.get("staffId").is_none());
    }

    #[tokio::test]
    async fn test_customer_bookings_query() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(200, json!({"data": [booking_json("no-show")]}));

        let bookings = get_customer_bookings(&client, "ada@x.io", Some(BookingStatus::NoShow))
            .await
            .unwrap();

        assert_eq!(bookings[0].status, BookingStatus::NoShow);
        assert_eq!(
            mock.last_request().unwrap().url,
            "https://shop.test/api/bookings?customerEmail=ada%40x.io&status=no-show"
        );
    }

    #[tokio::test]
    async fn test_cancel_booking_puts_status() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(200, booking_json("cancelled"));

        let booking = cancel_booking(&client, &BookingId::new("b1")).await.unwrap();

        assert_eq!(booking.status, BookingStatus::Cancelled);
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.method, Method::Put);
        assert_eq!(sent.url, "https://shop.test/api/bookings/b1");
        assert_eq!(sent.json_body().unwrap(), json!({"status": "cancelled"}));
    }

    #[tokio::test]
    async fn test_get_booking_by_id() {
        let (client, mock) = mock_client(Some("tok"));
        mock.push_json(200, booking_json("confirmed"));

        let booking = get_booking_by_id(&client, &BookingId::new("b1")).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }
}
