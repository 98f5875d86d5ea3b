use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_auth_tables::Users;
use crate::m20250301_000002_create_catalog_tables::{Brands, Services, Specializations};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create businesses table
        manager
            .create_table(
                Table::create()
                    .table(Businesses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Businesses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Businesses::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Businesses::DescriptionShort).string_len(500).null())
                    .col(ColumnDef::new(Businesses::DescriptionLong).text().null())
                    .col(ColumnDef::new(Businesses::IsFeatured).boolean().not_null().default(false))
                    .col(ColumnDef::new(Businesses::PriceRangeIndicator).string_len(10).null())
                    .col(
                        ColumnDef::new(Businesses::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending_approval"),
                    )
                    .col(ColumnDef::new(Businesses::CreatedBy).integer().null())
                    .col(ColumnDef::new(Businesses::UpdatedBy).integer().null())
                    .col(ColumnDef::new(Businesses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Businesses::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_businesses_name")
                    .table(Businesses::Table)
                    .col(Businesses::Name)
                    .to_owned(),
            )
            .await?;

        // Create contact_info table (1:1 with businesses)
        manager
            .create_table(
                Table::create()
                    .table(ContactInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContactInfo::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContactInfo::BusinessId).integer().not_null().unique_key())
                    .col(ColumnDef::new(ContactInfo::PhonePrimary).string_len(20).not_null())
                    .col(ColumnDef::new(ContactInfo::PhoneSecondary).string_len(20).null())
                    .col(ColumnDef::new(ContactInfo::EmailPrimary).string_len(255).null())
                    .col(ColumnDef::new(ContactInfo::WebsiteUrl).string().null())
                    .col(ColumnDef::new(ContactInfo::SocialMediaLinks).text().null())
                    .col(ColumnDef::new(ContactInfo::CreatedBy).integer().null())
                    .col(ColumnDef::new(ContactInfo::UpdatedBy).integer().null())
                    .col(ColumnDef::new(ContactInfo::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(ContactInfo::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contact_info_business_id")
                            .from(ContactInfo::Table, ContactInfo::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create locations table
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Locations::BusinessId).integer().not_null())
                    .col(ColumnDef::new(Locations::AddressLine1).string_len(255).not_null())
                    .col(ColumnDef::new(Locations::AddressLine2).string_len(255).null())
                    .col(ColumnDef::new(Locations::AreaLocality).string_len(100).null())
                    .col(ColumnDef::new(Locations::CityId).integer().not_null())
                    .col(ColumnDef::new(Locations::Pincode).string_len(10).not_null())
                    .col(ColumnDef::new(Locations::Latitude).double().null())
                    .col(ColumnDef::new(Locations::Longitude).double().null())
                    .col(ColumnDef::new(Locations::IsPrimary).boolean().not_null().default(false))
                    .col(ColumnDef::new(Locations::CreatedBy).integer().null())
                    .col(ColumnDef::new(Locations::UpdatedBy).integer().null())
                    .col(ColumnDef::new(Locations::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Locations::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_locations_business_id")
                            .from(Locations::Table, Locations::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_locations_business_id")
                    .table(Locations::Table)
                    .col(Locations::BusinessId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_locations_city_address")
                    .table(Locations::Table)
                    .col(Locations::CityId)
                    .col(Locations::AddressLine1)
                    .to_owned(),
            )
            .await?;

        // Create operating_hours table
        manager
            .create_table(
                Table::create()
                    .table(OperatingHours::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OperatingHours::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OperatingHours::BusinessId).integer().not_null())
                    .col(ColumnDef::new(OperatingHours::LocationId).integer().null())
                    .col(ColumnDef::new(OperatingHours::DayOfWeek).string_len(3).not_null())
                    .col(ColumnDef::new(OperatingHours::OpenTime).time().not_null())
                    .col(ColumnDef::new(OperatingHours::CloseTime).time().not_null())
                    .col(ColumnDef::new(OperatingHours::IsClosed).boolean().not_null().default(false))
                    .col(ColumnDef::new(OperatingHours::CreatedBy).integer().null())
                    .col(ColumnDef::new(OperatingHours::UpdatedBy).integer().null())
                    .col(ColumnDef::new(OperatingHours::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(OperatingHours::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_operating_hours_business_id")
                            .from(OperatingHours::Table, OperatingHours::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_operating_hours_location_id")
                            .from(OperatingHours::Table, OperatingHours::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_operating_hours_business_id")
                    .table(OperatingHours::Table)
                    .col(OperatingHours::BusinessId)
                    .to_owned(),
            )
            .await?;

        // Association tables
        manager
            .create_table(
                Table::create()
                    .table(BusinessServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessServices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BusinessServices::BusinessId).integer().not_null())
                    .col(ColumnDef::new(BusinessServices::ServiceId).integer().not_null())
                    .col(ColumnDef::new(BusinessServices::CreatedBy).integer().null())
                    .col(ColumnDef::new(BusinessServices::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_services_business_id")
                            .from(BusinessServices::Table, BusinessServices::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_services_service_id")
                            .from(BusinessServices::Table, BusinessServices::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_business_services_pair")
                    .table(BusinessServices::Table)
                    .col(BusinessServices::BusinessId)
                    .col(BusinessServices::ServiceId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessBrands::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessBrands::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BusinessBrands::BusinessId).integer().not_null())
                    .col(ColumnDef::new(BusinessBrands::BrandId).integer().not_null())
                    .col(ColumnDef::new(BusinessBrands::CreatedBy).integer().null())
                    .col(ColumnDef::new(BusinessBrands::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_brands_business_id")
                            .from(BusinessBrands::Table, BusinessBrands::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_brands_brand_id")
                            .from(BusinessBrands::Table, BusinessBrands::BrandId)
                            .to(Brands::Table, Brands::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_business_brands_pair")
                    .table(BusinessBrands::Table)
                    .col(BusinessBrands::BusinessId)
                    .col(BusinessBrands::BrandId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessSpecializations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessSpecializations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BusinessSpecializations::BusinessId).integer().not_null())
                    .col(ColumnDef::new(BusinessSpecializations::SpecializationId).integer().not_null())
                    .col(ColumnDef::new(BusinessSpecializations::CreatedBy).integer().null())
                    .col(ColumnDef::new(BusinessSpecializations::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_specializations_business_id")
                            .from(BusinessSpecializations::Table, BusinessSpecializations::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_specializations_specialization_id")
                            .from(BusinessSpecializations::Table, BusinessSpecializations::SpecializationId)
                            .to(Specializations::Table, Specializations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_business_specializations_pair")
                    .table(BusinessSpecializations::Table)
                    .col(BusinessSpecializations::BusinessId)
                    .col(BusinessSpecializations::SpecializationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create business_owners table
        manager
            .create_table(
                Table::create()
                    .table(BusinessOwners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessOwners::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BusinessOwners::BusinessId).integer().not_null())
                    .col(ColumnDef::new(BusinessOwners::UserId).integer().not_null())
                    .col(ColumnDef::new(BusinessOwners::Role).string_len(50).not_null())
                    .col(ColumnDef::new(BusinessOwners::AddedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_owners_business_id")
                            .from(BusinessOwners::Table, BusinessOwners::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_owners_user_id")
                            .from(BusinessOwners::Table, BusinessOwners::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_business_owners_pair")
                    .table(BusinessOwners::Table)
                    .col(BusinessOwners::BusinessId)
                    .col(BusinessOwners::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create portfolio_images table
        manager
            .create_table(
                Table::create()
                    .table(PortfolioImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortfolioImages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PortfolioImages::BusinessId).integer().not_null())
                    .col(ColumnDef::new(PortfolioImages::ImageUrl).string().not_null())
                    .col(ColumnDef::new(PortfolioImages::Caption).string_len(255).null())
                    .col(ColumnDef::new(PortfolioImages::DisplayOrder).integer().not_null().default(0))
                    .col(ColumnDef::new(PortfolioImages::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_images_business_id")
                            .from(PortfolioImages::Table, PortfolioImages::BusinessId)
                            .to(Businesses::Table, Businesses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            PortfolioImages::Table.into_iden(),
            BusinessOwners::Table.into_iden(),
            BusinessSpecializations::Table.into_iden(),
            BusinessBrands::Table.into_iden(),
            BusinessServices::Table.into_iden(),
            OperatingHours::Table.into_iden(),
            Locations::Table.into_iden(),
            ContactInfo::Table.into_iden(),
            Businesses::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Businesses {
    Table,
    Id,
    Name,
    DescriptionShort,
    DescriptionLong,
    IsFeatured,
    PriceRangeIndicator,
    Status,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ContactInfo {
    Table,
    Id,
    BusinessId,
    PhonePrimary,
    PhoneSecondary,
    EmailPrimary,
    WebsiteUrl,
    SocialMediaLinks,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    Id,
    BusinessId,
    AddressLine1,
    AddressLine2,
    AreaLocality,
    CityId,
    Pincode,
    Latitude,
    Longitude,
    IsPrimary,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OperatingHours {
    Table,
    Id,
    BusinessId,
    LocationId,
    DayOfWeek,
    OpenTime,
    CloseTime,
    IsClosed,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BusinessServices {
    Table,
    Id,
    BusinessId,
    ServiceId,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BusinessBrands {
    Table,
    Id,
    BusinessId,
    BrandId,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BusinessSpecializations {
    Table,
    Id,
    BusinessId,
    SpecializationId,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BusinessOwners {
    Table,
    Id,
    BusinessId,
    UserId,
    Role,
    AddedAt,
}

#[derive(DeriveIden)]
enum PortfolioImages {
    Table,
    Id,
    BusinessId,
    ImageUrl,
    Caption,
    DisplayOrder,
    CreatedAt,
}
