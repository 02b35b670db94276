use sea_orm::{ActiveModelTrait, EntityTrait, IdenStatic};

/// The four creation/modification columns of an auditable table
pub struct AuditColumns<C> {
    pub created_at: C,
    pub created_by: C,
    pub last_modified_at: C,
    pub last_modified_by: C,
}

impl<C: IdenStatic> AuditColumns<C> {
    pub fn contains(&self, column: &C) -> bool {
        let name = column.as_str();
        [
            &self.created_at,
            &self.created_by,
            &self.last_modified_at,
            &self.last_modified_by,
        ]
        .iter()
        .any(|c| c.as_str() == name)
    }
}

/// Active models that record when and by whom they were created and last modified
pub trait Auditable: ActiveModelTrait {
    fn audit_columns() -> AuditColumns<<Self::Entity as EntityTrait>::Column>;

    /// Columns holding owned sub-objects serialized inline (addresses, preferences).
    /// A change to one of them counts as a modification of the owner.
    fn owned_columns() -> Vec<<Self::Entity as EntityTrait>::Column> {
        Vec::new()
    }
}
