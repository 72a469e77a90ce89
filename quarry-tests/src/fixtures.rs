use quarry::{Column, Executor, Result, Table};

/// The cities / users / user_data schema most suite tests run against.
///
/// `cities.id` is an auto generated identity; `users.city_id` is a nullable
/// reference to it, so seeding exercises identity retrieval and its reuse as
/// a foreign key value.
pub struct Dataset {
    pub cities: Cities,
    pub users: Users,
    pub user_data: UserData,
}

pub struct Cities {
    pub table: Table,
    pub id: Column<i32>,
    pub name: Column<String>,
}

pub struct Users {
    pub table: Table,
    pub id: Column<String>,
    pub name: Column<String>,
    pub city_id: Column<Option<i32>>,
}

pub struct UserData {
    pub table: Table,
    pub user_id: Column<String>,
    pub comment: Column<String>,
    pub value: Column<i32>,
}

impl Dataset {
    pub fn declare() -> Self {
        let mut builder = Table::builder("cities");
        let id = builder.column::<i32>("id").auto_increment().take();
        let name = builder.column::<String>("name").take();
        let cities = Cities {
            table: builder.build().expect("Failed to declare cities"),
            id,
            name,
        };

        let mut builder = Table::builder("users");
        let id = builder.column::<String>("id").primary_key().take();
        let name = builder.column::<String>("name").take();
        let city_id = builder
            .column::<Option<i32>>("city_id")
            .references(&cities.id)
            .take();
        let users = Users {
            table: builder.build().expect("Failed to declare users"),
            id,
            name,
            city_id,
        };

        let mut builder = Table::builder("user_data");
        let user_id = builder
            .column::<String>("user_id")
            .references(&users.id)
            .take();
        let comment = builder.column::<String>("comment").take();
        let value = builder.column::<i32>("value").take();
        let user_data = UserData {
            table: builder.build().expect("Failed to declare user_data"),
            user_id,
            comment,
            value,
        };

        Self {
            cities,
            users,
            user_data,
        }
    }

    /// Drop, recreate and seed all three tables.
    pub async fn prepare<E: Executor>(&self, executor: &mut E) -> Result<()> {
        self.user_data.table.drop_table(executor, true).await?;
        self.users.table.drop_table(executor, true).await?;
        self.cities.table.drop_table(executor, true).await?;
        self.cities.table.create_table(executor, false).await?;
        self.users.table.create_table(executor, false).await?;
        self.user_data.table.create_table(executor, false).await?;

        let cities = &self.cities;
        let mut city_ids = Vec::new();
        for city in ["St. Petersburg", "Munich", "Prague"] {
            let id: i32 = cities
                .table
                .insert()
                .set(&cities.name, city.to_string())?
                .execute_returning_id(executor)
                .await?;
            city_ids.push(id);
        }

        let users = &self.users;
        let rows = [
            ("andrey", "Andrey", Some(city_ids[0])),
            ("sergey", "Sergey", Some(city_ids[1])),
            ("eugene", "Eugene", Some(city_ids[1])),
            ("alex", "Alex", None),
            ("smth", "Something", None),
        ];
        for (id, name, city_id) in rows {
            users
                .table
                .insert()
                .set(&users.id, id.to_string())?
                .set(&users.name, name.to_string())?
                .set(&users.city_id, city_id)?
                .execute(executor)
                .await?;
        }

        let user_data = &self.user_data;
        let rows = [
            ("smth", "Something is here", 10),
            ("smth", "Comment #2", 20),
            ("eugene", "Comment for Eugene", 20),
            ("sergey", "Comment for Sergey", 30),
        ];
        for (user_id, comment, value) in rows {
            user_data
                .table
                .insert()
                .set(&user_data.user_id, user_id.to_string())?
                .set(&user_data.comment, comment.to_string())?
                .set(&user_data.value, value)?
                .execute(executor)
                .await?;
        }
        Ok(())
    }
}
