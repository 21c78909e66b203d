//! Sign-in and session commands.

use anyhow::{Context as _, Result};
use dialoguer::Input;
use serde_json::json;
use storefront_api::auth::{
    self, RegisterRequest, SendOtpRequest, VerifyOtpRequest, VerifyRegisterRequest,
};
use storefront_api::AuthStatus;

use super::{AuthArgs, AuthCommand};
use crate::context::Context;

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::SendOtp { phone } => send_otp(&phone, ctx).await,
        AuthCommand::Register {
            phone,
            first_name,
            last_name,
            email,
        } => register(phone, first_name, last_name, email, ctx).await,
        AuthCommand::Verify {
            phone,
            otp,
            register,
            first_name,
            last_name,
            email,
        } => {
            let profile = register.then_some((first_name, last_name, email));
            verify(phone, otp, profile, ctx).await
        }
        AuthCommand::Logout => logout(ctx).await,
        AuthCommand::Status => status(ctx).await,
    }
}

async fn send_otp(phone: &str, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let request = SendOtpRequest {
        phone: phone.to_string(),
        tenant_slug: ctx.tenant_slug()?,
    };

    let spinner = ctx.output.spinner("Sending code...");
    let response = auth::send_customer_otp(&client, &request).await;
    spinner.finish_and_clear();
    let response = response.context("Failed to send code")?;

    if ctx.output.is_json() {
        ctx.output
            .json(&json!({"message": response.message, "expiresIn": response.expires_in}));
        return Ok(());
    }

    ctx.output.success(&format!("Code sent to {}", phone));
    if let Some(secs) = response.expires_in {
        ctx.output.info(&format!("The code expires in {} minute(s)", secs.div_ceil(60)));
    }
    ctx.output
        .info(&format!("Run `storefront auth verify {}` to sign in", phone));
    Ok(())
}

async fn register(
    phone: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    ctx: &Context,
) -> Result<()> {
    let client = ctx.client()?;
    let request = RegisterRequest {
        first_name,
        last_name,
        phone: phone.clone(),
        email,
        tenant_slug: ctx.tenant_slug()?,
    };

    let response = auth::register(&client, &request)
        .await
        .context("Registration failed")?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "message": response.message,
            "requiresOtpVerification": response.requires_otp_verification,
        }));
        return Ok(());
    }

    ctx.output.success(&response.message);
    if response.requires_otp_verification {
        ctx.output.info(&format!(
            "Run `storefront auth verify {} --register` with the code you received",
            phone
        ));
    }
    Ok(())
}

type Profile = (Option<String>, Option<String>, Option<String>);

async fn verify(
    phone: String,
    otp: Option<String>,
    profile: Option<Profile>,
    ctx: &Context,
) -> Result<()> {
    let otp = match otp {
        Some(otp) => otp,
        None => Input::<String>::new()
            .with_prompt("Verification code")
            .interact_text()?,
    };

    let state = ctx.app_state().await?;
    let request = VerifyOtpRequest {
        phone,
        otp: otp.trim().to_string(),
        tenant_slug: ctx.tenant_slug()?,
    };

    let spinner = ctx.output.spinner("Verifying...");
    let session = match profile {
        Some((first_name, last_name, email)) => {
            let request = VerifyRegisterRequest {
                otp: request,
                first_name,
                last_name,
                email,
            };
            auth::verify_register_otp(state.client(), &request).await
        }
        None => auth::verify_customer_otp(state.client(), &request).await,
    };
    spinner.finish_and_clear();
    let session = session.context("Verification failed")?;

    let customer = session.user.clone();
    state.sign_in(session).await?;

    if ctx.output.is_json() {
        ctx.output.json(&customer);
        return Ok(());
    }

    ctx.output
        .success(&format!("Signed in as {}", customer.full_name().trim()));
    ctx.output.debug(&format!(
        "Session saved to {}",
        ctx.session_path().display()
    ));
    Ok(())
}

async fn logout(ctx: &Context) -> Result<()> {
    let state = ctx.app_state().await?;
    state.logout().await?;
    ctx.save_cart(&state.cart().snapshot())?;

    ctx.output.success("Signed out; cart cleared");
    Ok(())
}

async fn status(ctx: &Context) -> Result<()> {
    let state = ctx.app_state().await?;
    let auth = state.auth().await;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "authenticated": auth.is_authenticated(),
            "customer": auth.customer,
        }));
        return Ok(());
    }

    match (auth.status, &auth.customer) {
        (AuthStatus::SignedIn, Some(customer)) => {
            ctx.output.success("Signed in");
            ctx.output.kv("name", customer.full_name().trim());
            if let Some(email) = customer.contact_email() {
                ctx.output.kv("email", email);
            }
            if let Some(phone) = &customer.phone {
                ctx.output.kv("phone", phone);
            }
        }
        _ => {
            ctx.output.info("Not signed in");
            ctx.output
                .info("Run `storefront auth send-otp <PHONE>` to sign in");
        }
    }
    Ok(())
}
