//! Zivaas CLI - browse and manage Zivaas property listings

use clap::Parser;
use tracing_subscriber::EnvFilter;
use zivaas_cli::{
    check_upload_size, image_content_type, object_name, parse_role, run_developers, run_health,
    run_listings, run_login, run_property_add, run_property_delete, run_property_update,
    run_save_criteria, run_show, run_signup, run_upload_image, run_wishlist_add,
    run_wishlist_list, run_wishlist_remove, Cli, Commands, ListingsRequest, LoanArgs,
    PropertyAction, WishlistAction,
};
use zivaas_core::{
    FilterStore, GatewayConfig, ListingsCache, NewProperty, PropertyPatch, RestGateway, Result,
    WishlistCriteria,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match (&cli.gateway_url, &cli.gateway_key) {
        (Some(url), Some(key)) => GatewayConfig::new(url, key),
        _ => GatewayConfig::from_env()?,
    };
    if let Some(path) = &cli.filter_store {
        config.filter_store_path = path.clone();
    }
    tracing::debug!(gateway = %config.base_url, "connecting to gateway");

    let mut gateway = RestGateway::new(&config);
    if let Some(token) = &cli.access_token {
        gateway = gateway.with_access_token(token.clone());
    }
    let store = FilterStore::new(&config.filter_store_path);
    let cache = ListingsCache::default();
    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::Listings {
            search,
            location,
            price,
            area,
            property_type,
            status,
            sort,
            page,
            saved_criteria,
            clear,
            user,
        } => {
            let request = ListingsRequest {
                search,
                location,
                price,
                area,
                property_type,
                status,
                sort,
                page,
                saved_criteria,
                clear,
                user,
            };
            run_listings(&gateway, &cache, &store, &request, &mut stdout).await?;
        }
        Commands::Show {
            id,
            loan_amount,
            interest_rate,
            tenure_years,
        } => {
            let loan = loan_amount.map(|amount| LoanArgs {
                amount,
                rate: interest_rate,
                years: tenure_years,
            });
            run_show(&gateway, id, loan.as_ref(), &mut stdout).await?;
        }
        Commands::Developers { name } => {
            run_developers(&gateway, &cache, name.as_deref(), &mut stdout).await?;
        }
        Commands::Wishlist { action } => match action {
            WishlistAction::Add { user, property_id } => {
                run_wishlist_add(&gateway, &cache, user, property_id, &mut stdout).await?;
            }
            WishlistAction::Remove { user, property_id } => {
                run_wishlist_remove(&gateway, &cache, user, property_id, &mut stdout).await?;
            }
            WishlistAction::List { user } => {
                run_wishlist_list(&gateway, &cache, user, &mut stdout).await?;
            }
        },
        Commands::SaveCriteria {
            user,
            location,
            price,
            area,
            property_type,
            status,
        } => {
            let criteria = WishlistCriteria {
                location,
                price,
                area,
                property_type,
                status,
            };
            run_save_criteria(&gateway, user, &criteria, &mut stdout).await?;
        }
        Commands::Property { action } => match action {
            PropertyAction::Add {
                name,
                location,
                price,
                carpet_area,
                configuration,
                property_type,
                status,
                images,
                developer,
            } => {
                let property = NewProperty {
                    name,
                    location,
                    price,
                    carpet_area,
                    configuration,
                    property_type,
                    status,
                    images,
                    developer_id: developer,
                };
                run_property_add(&gateway, &cache, &property, &mut stdout).await?;
            }
            PropertyAction::Update {
                id,
                name,
                location,
                price,
                carpet_area,
                configuration,
                property_type,
                status,
                images,
            } => {
                let patch = PropertyPatch {
                    name,
                    location,
                    price,
                    carpet_area,
                    configuration,
                    property_type,
                    status,
                    images,
                };
                run_property_update(&gateway, &cache, id, &patch, &mut stdout).await?;
            }
            PropertyAction::Delete { id } => {
                run_property_delete(&gateway, &cache, id, &mut stdout).await?;
            }
            PropertyAction::UploadImage { path, developer } => {
                let metadata = std::fs::metadata(&path)?;
                check_upload_size(metadata.len())?;
                let content_type = image_content_type(&path)?;
                let bytes = std::fs::read(&path)?;
                let name = object_name(developer, &path);
                run_upload_image(&gateway, &name, bytes, content_type, &mut stdout).await?;
            }
        },
        Commands::Login { email, password } => {
            run_login(&gateway, &email, &password, &mut stdout).await?;
        }
        Commands::Signup {
            email,
            password,
            username,
            role,
        } => {
            run_signup(
                &gateway,
                &email,
                &password,
                &username,
                parse_role(&role),
                &mut stdout,
            )
            .await?;
        }
        Commands::Health => {
            run_health(&gateway, &mut stdout).await?;
        }
    }
    Ok(())
}
