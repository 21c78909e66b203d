//! CLI command implementations.

pub mod auth;
pub mod bookings;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod orders;
pub mod products;

use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Tenant slug to write into the file.
        #[arg(short, long)]
        tenant: Option<String>,
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration.
    Validate,
}

/// Arguments for the auth command.
#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Send a one-time code to a phone number.
    SendOtp {
        /// Phone number.
        phone: String,
    },
    /// Register a new customer; a code is sent to the phone.
    Register {
        /// Phone number.
        phone: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Verify a one-time code and save the session.
    Verify {
        /// Phone number the code was sent to.
        phone: String,
        /// The code; prompted for when omitted.
        #[arg(long)]
        otp: Option<String>,
        /// Complete a registration instead of a login.
        #[arg(long)]
        register: bool,
        #[arg(long, requires = "register")]
        first_name: Option<String>,
        #[arg(long, requires = "register")]
        last_name: Option<String>,
        #[arg(long, requires = "register")]
        email: Option<String>,
    },
    /// Sign out and clear the cart.
    Logout,
    /// Show the current session.
    Status,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List active products.
    List {
        /// Search text.
        #[arg(short, long)]
        search: Option<String>,
        /// Category id.
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(short, long)]
        limit: Option<u32>,
        /// Include inactive products.
        #[arg(long)]
        all: bool,
    },
    /// Show a product and its variations.
    Show {
        /// Product id.
        id: String,
    },
}

/// Variation selector shared by cart commands.
#[derive(Args, Clone, Default)]
pub struct VariationArgs {
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    /// Variation type.
    #[arg(long = "type")]
    pub kind: Option<String>,
}

impl VariationArgs {
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.color.is_none() && self.kind.is_none()
    }
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a product.
    Add {
        /// Product id.
        product_id: String,
        #[arg(short, long, default_value = "1")]
        quantity: i64,
        #[command(flatten)]
        variation: VariationArgs,
    },
    /// Remove a line.
    Remove {
        product_id: String,
        #[command(flatten)]
        variation: VariationArgs,
    },
    /// Set a line's quantity; 0 removes it.
    Set {
        product_id: String,
        quantity: i64,
        #[command(flatten)]
        variation: VariationArgs,
    },
    /// Apply or clear a discount code.
    Discount {
        /// Code to validate and apply.
        #[arg(required_unless_present = "clear")]
        code: Option<String>,
        /// Remove the current discount.
        #[arg(long, conflicts_with = "code")]
        clear: bool,
    },
    /// Show the cart.
    Show,
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PaymentArg {
    Cash,
    Card,
    Online,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Payment method.
    #[arg(short, long, value_enum, default_value = "cash")]
    pub payment: PaymentArg,

    /// Pick up in store instead of delivery.
    #[arg(long)]
    pub pickup: bool,

    /// Contact email (defaults to the signed-in customer's).
    #[arg(long)]
    pub email: Option<String>,

    /// Contact phone (defaults to the signed-in customer's).
    #[arg(long)]
    pub phone: Option<String>,

    /// Order notes.
    #[arg(long)]
    pub notes: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: Option<OrdersCommand>,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders of the signed-in customer.
    List {
        /// Status filter.
        #[arg(short, long)]
        status: Option<String>,
        /// Earliest date (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show an order.
    Show {
        /// Order id.
        id: String,
    },
}

/// Arguments for the bookings command.
#[derive(Args)]
pub struct BookingsArgs {
    #[command(subcommand)]
    pub command: BookingsCommand,
}

#[derive(Subcommand)]
pub enum BookingsCommand {
    /// Available time slots on a day.
    Slots {
        /// Date (YYYY-MM-DD); defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// Service duration in minutes.
        #[arg(long, default_value = "30")]
        duration: u32,
        /// Staff member id.
        #[arg(long)]
        staff: Option<String>,
    },
    /// Bookings of the signed-in customer.
    List {
        /// Status filter.
        #[arg(short, long)]
        status: Option<String>,
        /// Only bookings that have not started.
        #[arg(long)]
        upcoming: bool,
    },
    /// Cancel a booking.
    Cancel {
        /// Booking id.
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(value: &str) -> anyhow::Result<chrono::NaiveDate> {
    use anyhow::Context as _;
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("02/29/2024").is_err());
    }
}
