use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool tuning
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .unwrap_or("Cravings");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes for optimal query performance
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        // users(user_id) - primary lookup everywhere
        let users = self.database().collection::<mongodb::bson::Document>("users");

        let users_id_index = IndexModel::builder().keys(doc! { "user_id": 1 }).build();
        match users.create_index(users_id_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(user_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // users(email) - duplicate check at registration
        let users_email_index = IndexModel::builder().keys(doc! { "email": 1 }).build();
        match users.create_index(users_email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // users(role, verified) - partner verification listing
        let users_role_index = IndexModel::builder()
            .keys(doc! { "role": 1, "verified": 1 })
            .build();
        match users.create_index(users_role_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(role, verified)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // menu_items(hotel_id) - per-hotel menu queries
        let menu_items = self
            .database()
            .collection::<mongodb::bson::Document>("menu_items");

        let menu_index = IndexModel::builder().keys(doc! { "hotel_id": 1 }).build();
        match menu_items.create_index(menu_index).await {
            Ok(_) => log::info!("   ✅ Index created: menu_items(hotel_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // offers(hotel_id) and offers(to_time) - admin listing and the
        // active-offers scan
        let offers = self.database().collection::<mongodb::bson::Document>("offers");

        let offers_hotel_index = IndexModel::builder().keys(doc! { "hotel_id": 1 }).build();
        match offers.create_index(offers_hotel_index).await {
            Ok(_) => log::info!("   ✅ Index created: offers(hotel_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let offers_to_time_index = IndexModel::builder().keys(doc! { "to_time": 1 }).build();
        match offers.create_index(offers_to_time_index).await {
            Ok(_) => log::info!("   ✅ Index created: offers(to_time)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // categories(hotel_id)
        let categories = self
            .database()
            .collection::<mongodb::bson::Document>("categories");

        let categories_index = IndexModel::builder().keys(doc! { "hotel_id": 1 }).build();
        match categories.create_index(categories_index).await {
            Ok(_) => log::info!("   ✅ Index created: categories(hotel_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
