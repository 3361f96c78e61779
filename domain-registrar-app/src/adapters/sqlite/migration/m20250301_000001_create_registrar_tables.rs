use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // registrars 表
        manager
            .create_table(
                Table::create()
                    .table(Registrar::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrar::Code)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registrar::Name).string().not_null())
                    .col(ColumnDef::new(Registrar::RegistrarType).string().not_null())
                    .col(
                        ColumnDef::new(Registrar::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Registrar::Endpoint).string().null())
                    .col(ColumnDef::new(Registrar::CredentialRef).string().not_null())
                    .col(ColumnDef::new(Registrar::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // registrar_credentials 表（AES-256-GCM 密文）
        manager
            .create_table(
                Table::create()
                    .table(RegistrarCredential::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegistrarCredential::CredentialRef)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RegistrarCredential::Salt).string().not_null())
                    .col(ColumnDef::new(RegistrarCredential::Nonce).string().not_null())
                    .col(
                        ColumnDef::new(RegistrarCredential::Ciphertext)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RegistrarCredential::Iterations)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // registered_domains 表
        manager
            .create_table(
                Table::create()
                    .table(RegisteredDomain::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegisteredDomain::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RegisteredDomain::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(RegisteredDomain::CustomerId).string().not_null())
                    .col(ColumnDef::new(RegisteredDomain::RegistrarCode).string().null())
                    .col(
                        ColumnDef::new(RegisteredDomain::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(RegisteredDomain::PeriodYears)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(RegisteredDomain::ExpiresAt).string().null())
                    .col(
                        ColumnDef::new(RegisteredDomain::ExternalReference)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(RegisteredDomain::LastError).string().null())
                    .col(ColumnDef::new(RegisteredDomain::CreatedAt).string().not_null())
                    .col(ColumnDef::new(RegisteredDomain::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registered_domains_registrar")
                    .table(RegisteredDomain::Table)
                    .col(RegisteredDomain::RegistrarCode)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // dns_records 表
        manager
            .create_table(
                Table::create()
                    .table(DnsRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DnsRecord::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DnsRecord::DomainId).string().not_null())
                    .col(ColumnDef::new(DnsRecord::RecordType).string().not_null())
                    .col(ColumnDef::new(DnsRecord::Name).string().not_null())
                    .col(ColumnDef::new(DnsRecord::Value).string().not_null())
                    .col(ColumnDef::new(DnsRecord::Ttl).big_integer().not_null())
                    .col(ColumnDef::new(DnsRecord::Priority).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dns_records_domain")
                            .from(DnsRecord::Table, DnsRecord::DomainId)
                            .to(RegisteredDomain::Table, RegisteredDomain::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dns_records_domain")
                    .table(DnsRecord::Table)
                    .col(DnsRecord::DomainId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // registrants 表
        manager
            .create_table(
                Table::create()
                    .table(Registrant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registrant::CustomerId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registrant::Contact).string().not_null())
                    .col(ColumnDef::new(Registrant::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registrant::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DnsRecord::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RegisteredDomain::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RegistrarCredential::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Registrar::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Registrar {
    #[sea_orm(iden = "registrars")]
    Table,
    Code,
    Name,
    RegistrarType,
    IsActive,
    Endpoint,
    CredentialRef,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RegistrarCredential {
    #[sea_orm(iden = "registrar_credentials")]
    Table,
    CredentialRef,
    Salt,
    Nonce,
    Ciphertext,
    Iterations,
}

#[derive(DeriveIden)]
enum RegisteredDomain {
    #[sea_orm(iden = "registered_domains")]
    Table,
    Id,
    Name,
    CustomerId,
    RegistrarCode,
    Status,
    PeriodYears,
    ExpiresAt,
    ExternalReference,
    LastError,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DnsRecord {
    #[sea_orm(iden = "dns_records")]
    Table,
    Id,
    DomainId,
    RecordType,
    Name,
    Value,
    Ttl,
    Priority,
}

#[derive(DeriveIden)]
enum Registrant {
    #[sea_orm(iden = "registrants")]
    Table,
    CustomerId,
    Contact,
    UpdatedAt,
}
