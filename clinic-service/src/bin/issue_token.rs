use anyhow::{anyhow, Context, Result};
use clap::Parser;
use clinic_service::config::{jwt_config_from_env, DEFAULT_DATABASE_URL};
use clinic_service::db;
use clinic_service::repo::staff::{self, NewStaff};
use common_auth::{Role, TokenSigner};

/// Doctors and staff have no login endpoint; this is how they get a bearer token.
#[derive(Parser, Debug)]
#[command(about = "Mint a clinic access token with the configured signing secret", long_about = None)]
struct Options {
    /// Subject id the token is issued for
    #[arg(long = "subject", value_name = "ID", required_unless_present = "create_staff")]
    subject: Option<i64>,

    /// Role claim: patient, doctor or staff
    #[arg(long = "role", default_value = "staff")]
    role: Role,

    /// Insert a staff member with this name first and issue the token for it
    #[arg(long = "create-staff", value_name = "NAME", conflicts_with = "subject")]
    create_staff: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let opts = Options::parse();
    let jwt = jwt_config_from_env()?;

    let subject = match (opts.subject, opts.create_staff) {
        (Some(subject), _) => subject,
        (None, Some(name)) => {
            if opts.role != Role::Staff {
                return Err(anyhow!("--create-staff only issues staff tokens"));
            }
            let database_url = std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
            let pool = db::connect(&database_url, 1).await?;
            let mut conn = pool.acquire().await.context("Failed to acquire connection")?;
            let id = staff::create(&mut conn, &NewStaff { name: name.clone() })
                .await
                .with_context(|| format!("Failed to create staff member '{name}'"))?;
            eprintln!("created staff member {id} ({name})");
            id
        }
        (None, None) => return Err(anyhow!("either --subject or --create-staff is required")),
    };

    let issued = TokenSigner::new(&jwt)
        .issue(subject, opts.role)
        .map_err(|err| anyhow!("Failed to sign token: {err}"))?;
    eprintln!(
        "subject {subject} role {} expires {}",
        opts.role,
        issued.expires_at.to_rfc3339()
    );
    println!("{}", issued.access_token);
    Ok(())
}
