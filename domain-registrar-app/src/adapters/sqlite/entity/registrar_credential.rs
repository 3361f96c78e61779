use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "registrar_credentials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub credential_ref: String,
    pub salt: String,
    pub nonce: String,
    pub ciphertext: String,
    pub iterations: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
