//! Platform database migrations.
//!
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_profiles_table;
mod m20240101_000003_create_jobs_table;
mod m20240101_000004_create_applications_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_profiles_table::Migration),
            Box::new(m20240101_000003_create_jobs_table::Migration),
            Box::new(m20240101_000004_create_applications_table::Migration),
        ]
    }
}

#[derive(Iden)]
pub(crate) enum Users {
    Table,
    Id,
    Email,
    Role,
    CredentialId,
    CreatedAt,
}

#[derive(Iden)]
pub(crate) enum Jobs {
    Table,
    Id,
    OwnerId,
    Title,
    Description,
    Location,
    SalaryMin,
    SalaryMax,
    RemoteType,
    Seniority,
    Status,
    CreatedAt,
    UpdatedAt,
}
