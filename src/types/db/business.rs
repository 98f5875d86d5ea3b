use sea_orm::entity::prelude::*;

/// Listing lifecycle. Any authorized update may move a listing to any status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum BusinessStatus {
    #[default]
    #[sea_orm(string_value = "pending_approval")]
    PendingApproval,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "businesses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description_short: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description_long: Option<String>,
    pub is_featured: bool,
    pub price_range_indicator: Option<String>,
    pub status: BusinessStatus,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::contact_info::Entity")]
    ContactInfo,
    #[sea_orm(has_many = "super::location::Entity")]
    Locations,
    #[sea_orm(has_many = "super::operating_hours::Entity")]
    OperatingHours,
    #[sea_orm(has_many = "super::business_owner::Entity")]
    Owners,
}

impl Related<super::contact_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContactInfo.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locations.def()
    }
}

impl Related<super::operating_hours::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OperatingHours.def()
    }
}

impl Related<super::business_owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owners.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
