//! Member factory: simple, reference and collection members.

use super::association::effective_association_name;
use super::error::{BuildError, NameScope};
use super::handler::{AssemblyBuilder, TypeRef};
use crate::metadata::{
    AssociationAttribute, DataType, MemberDescriptor, MemberKind, MetadataKind, RelationType,
    TemplateKind, TypeAttribute,
};
use crate::store::MetadataStore;
use tracing::debug;

impl<S: MetadataStore> AssemblyBuilder<S> {
    pub(super) fn add_simple_member(
        &mut self,
        class: usize,
        name: String,
        data_type: DataType,
    ) -> Result<(), BuildError> {
        self.ensure_member_name_free(class, &name)?;
        let oid = self.store.create_object(MetadataKind::SimpleMember)?;
        let member = MemberDescriptor::new(
            oid,
            name,
            MemberKind::Simple { data_type },
            TemplateKind::ReadWriteMember,
        );
        self.push_member(class, member);
        Ok(())
    }

    pub(super) fn add_reference_member(
        &mut self,
        class: usize,
        name: String,
        target: &TypeRef,
        create_association: bool,
        association_name: Option<&str>,
    ) -> Result<(), BuildError> {
        self.ensure_member_name_free(class, &name)?;
        let target = self.resolve(class, target)?;
        let oid = self.store.create_object(MetadataKind::ReferenceMember)?;
        let mut member = MemberDescriptor::new(
            oid,
            name,
            MemberKind::Reference {
                reference_type_full_name: target.full_name,
                relation_type: RelationType::OneToMany,
            },
            TemplateKind::ReadWriteMember,
        );
        if create_association || association_name.is_some() {
            let association = self.new_association(&member.name, association_name)?;
            member.type_attributes.push(association);
        }
        self.push_member(class, member);
        Ok(())
    }

    pub(super) fn add_collection_member(
        &mut self,
        class: usize,
        name: String,
        target: &TypeRef,
        association_name: Option<&str>,
    ) -> Result<(), BuildError> {
        self.ensure_member_name_free(class, &name)?;
        let target = self.resolve(class, target)?;
        let oid = self.store.create_object(MetadataKind::CollectionMember)?;
        let mut member = MemberDescriptor::new(
            oid,
            name,
            MemberKind::Collection {
                collection_type_full_name: target.full_name,
                relation_type: RelationType::OneToMany,
            },
            TemplateKind::ReadOnlyMember,
        );
        let association = self.new_association(&member.name, association_name)?;
        member.type_attributes.push(association);
        self.push_member(class, member);
        Ok(())
    }

    pub(super) fn add_default_class_options(&mut self, class: usize) -> Result<(), BuildError> {
        let oid = self
            .store
            .create_object(MetadataKind::DefaultClassOptionsAttribute)?;
        let class = &mut self.assembly.classes[class];
        class
            .type_attributes
            .push(TypeAttribute::DefaultClassOptions { oid });
        debug!(class = %class.full_name(), "Added default class options");
        Ok(())
    }

    /// Simple name of a reference target, used as the member name.
    pub(super) fn target_simple_name(&self, class: usize, target: &TypeRef) -> Result<String, BuildError> {
        Ok(self.resolve(class, target)?.name)
    }

    fn new_association(
        &mut self,
        member_name: &str,
        explicit: Option<&str>,
    ) -> Result<TypeAttribute, BuildError> {
        let oid = self.store.create_object(MetadataKind::AssociationAttribute)?;
        Ok(TypeAttribute::Association(AssociationAttribute {
            oid,
            association_name: effective_association_name(member_name, explicit),
        }))
    }

    fn ensure_member_name_free(&self, class: usize, name: &str) -> Result<(), BuildError> {
        let class = &self.assembly.classes[class];
        if class.has_member(name) {
            return Err(BuildError::DuplicateName {
                scope: NameScope::Class(class.full_name()),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn push_member(&mut self, class: usize, member: MemberDescriptor) {
        let class = &mut self.assembly.classes[class];
        debug!(
            class = %class.full_name(),
            member = %member.name,
            association = member.association_name(),
            "Created member"
        );
        class.members.push(member);
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{AssemblyBuilder, BuildError, BuilderConfig, ClassHandler};
    use crate::metadata::{DataType, ExternalType, MetadataKind, TemplateKind};
    use crate::store::MemoryStore;

    fn open(store: &mut MemoryStore) -> AssemblyBuilder<&mut MemoryStore> {
        let config = BuilderConfig::named("Crm").with_external_type("System.Object");
        AssemblyBuilder::open_with_config(store, config).unwrap()
    }

    #[test]
    fn test_simple_members_per_class() {
        let mut store = MemoryStore::new();
        let mut builder = open(&mut store);

        builder
            .create_classes(["Person", "Company"])
            .unwrap()
            .create_simple_members(DataType::String, |c| match c.name.as_str() {
                "Person" => vec!["FirstName", "LastName"],
                _ => vec![],
            })
            .unwrap()
            .create_simple_members("Int32", |c| match c.name.as_str() {
                "Company" => Some("Employees"),
                _ => None,
            })
            .unwrap();

        let person = builder.assembly().get_class("Person").unwrap();
        assert_eq!(person.member_names(), vec!["FirstName", "LastName"]);
        assert!(person
            .members
            .iter()
            .all(|m| m.data_type() == Some(DataType::String)
                && m.template == TemplateKind::ReadWriteMember));

        let company = builder.assembly().get_class("Company").unwrap();
        assert_eq!(company.members[0].data_type(), Some(DataType::Int32));
    }

    #[test]
    fn test_duplicate_member_name() {
        let mut store = MemoryStore::new();
        let mut builder = open(&mut store);
        let mut batch = builder.create_classes(["Person"]).unwrap();
        batch
            .create_simple_members(DataType::String, |_| ["Name"])
            .unwrap();

        let result = batch.create_simple_members(DataType::Int32, |_| ["Name"]);

        assert!(matches!(result, Err(BuildError::DuplicateName { .. })));
        let person = builder.assembly().get_class("Person").unwrap();
        assert_eq!(person.members.len(), 1);
        assert_eq!(person.members[0].data_type(), Some(DataType::String));
    }

    #[test]
    fn test_invalid_kind_runs_no_selector() {
        let mut store = MemoryStore::new();
        let mut builder = open(&mut store);
        let calls = std::cell::Cell::new(0);

        let result = builder
            .create_classes(["Person"])
            .unwrap()
            .create_simple_members("Money", |_| {
                calls.set(calls.get() + 1);
                ["Salary"]
            })
            .map(|_| ());

        assert!(matches!(result, Err(BuildError::InvalidKind(ref kind)) if kind == "Money"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_selector_invoked_once_per_class() {
        let mut store = MemoryStore::new();
        let mut builder = open(&mut store);
        let visited = std::cell::RefCell::new(Vec::new());

        builder
            .create_classes(["A", "B", "C"])
            .unwrap()
            .create_simple_members(DataType::Boolean, |c| {
                visited.borrow_mut().push(c.name.clone());
                Vec::<String>::new()
            })
            .unwrap();

        assert_eq!(*visited.borrow(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_reference_members_named_after_target() {
        let mut store = MemoryStore::new();
        let mut builder = open(&mut store);
        let mut batch = builder.create_classes(["Order", "Customer"]).unwrap();
        let customer = batch.class_id("Customer").unwrap();

        batch
            .create_reference_members(
                |c| match c.name.as_str() {
                    "Order" => vec![customer],
                    _ => vec![],
                },
                true,
            )
            .unwrap()
            .create_reference_members(
                |c| match c.name.as_str() {
                    "Customer" => vec![ExternalType::new("System.Object")],
                    _ => vec![],
                },
                false,
            )
            .unwrap();

        let order = builder.assembly().get_class("Order").unwrap();
        let reference = order.get_member("Customer").unwrap();
        assert_eq!(reference.target_full_name(), Some("Crm.Customer"));
        assert_eq!(reference.association_name(), Some("Customer"));
        assert_eq!(reference.template, TemplateKind::ReadWriteMember);

        let customer = builder.assembly().get_class("Customer").unwrap();
        let object = customer.get_member("Object").unwrap();
        assert_eq!(object.target_full_name(), Some("System.Object"));
        assert!(object.association().is_none());
    }

    #[test]
    fn test_unresolved_reference_keeps_siblings() {
        let mut store = MemoryStore::new();
        let mut builder = open(&mut store);

        let result = builder
            .create_classes(["Order"])
            .unwrap()
            .create_reference_members(
                |_| {
                    vec![
                        ExternalType::new("System.Object"),
                        ExternalType::new("Billing.Invoice"),
                    ]
                },
                false,
            )
            .map(|_| ());

        assert!(matches!(
            result,
            Err(BuildError::UnresolvedReference { ref target, .. }) if target == "Billing.Invoice"
        ));
        let order = builder.assembly().get_class("Order").unwrap();
        assert_eq!(order.member_names(), vec!["Object"]);
    }

    #[test]
    fn test_explicit_reference_member() {
        let mut store = MemoryStore::new();
        let mut builder = open(&mut store);
        let mut batch = builder.create_classes(["Person", "Company"]).unwrap();
        let person = batch.class_id("Person").unwrap();
        let company = batch.class_id("Company").unwrap();

        batch
            .create_reference_member(person, "Employer", company, true, None)
            .unwrap()
            .create_reference_member(
                person,
                "Account",
                ExternalType::new("System.Object"),
                false,
                None,
            )
            .unwrap();

        let person = builder.assembly().get_class("Person").unwrap();
        assert_eq!(person.member_names(), vec!["Employer", "Account"]);
        assert_eq!(
            person.get_member("Employer").unwrap().association_name(),
            Some("Employer")
        );
    }

    #[test]
    fn test_reference_keeps_explicit_association_name() {
        let mut store = MemoryStore::new();
        let mut builder = open(&mut store);
        let mut batch = builder.create_classes(["Person", "Company"]).unwrap();
        let person = batch.class_id("Person").unwrap();
        let company = batch.class_id("Company").unwrap();

        batch
            .create_reference_member(person, "Employer", company, true, Some("Staff"))
            .unwrap()
            .create_reference_member(person, "Owner", company, false, Some("Owners"))
            .unwrap();

        let person = builder.assembly().get_class("Person").unwrap();
        assert_eq!(
            person.get_member("Employer").unwrap().association_name(),
            Some("Staff")
        );
        assert_eq!(
            person.get_member("Owner").unwrap().association_name(),
            Some("Owners")
        );
    }

    #[test]
    fn test_collection_member_always_associated() {
        let mut store = MemoryStore::new();
        let mut builder = open(&mut store);
        let mut batch = builder.create_classes(["Company", "Person"]).unwrap();
        let company = batch.class_id("Company").unwrap();
        let person = batch.class_id("Person").unwrap();

        batch
            .create_collection_member(company, "Employees", person, None)
            .unwrap()
            .create_collection_member(company, "Alumni", person, Some("Company-Alumni"))
            .unwrap();

        let company = builder.assembly().get_class("Company").unwrap();
        let employees = company.get_member("Employees").unwrap();
        assert!(employees.is_collection());
        assert_eq!(employees.target_full_name(), Some("Crm.Person"));
        assert_eq!(employees.association_name(), Some("Employees"));
        assert_eq!(employees.template, TemplateKind::ReadOnlyMember);
        assert_eq!(
            company.get_member("Alumni").unwrap().association_name(),
            Some("Company-Alumni")
        );
    }

    #[test]
    fn test_collection_to_unknown_type() {
        let mut store = MemoryStore::new();
        let mut builder = open(&mut store);
        let mut batch = builder.create_classes(["Company"]).unwrap();
        let company = batch.class_id("Company").unwrap();

        let result = batch
            .create_collection_member(company, "Projects", ExternalType::new("Pm.Project"), None)
            .map(|_| ());

        assert!(matches!(result, Err(BuildError::UnresolvedReference { .. })));
        assert!(builder.assembly().get_class("Company").unwrap().members.is_empty());
    }

    #[test]
    fn test_association_store_failure_aborts_member() {
        let mut store = MemoryStore::new().fail_on(MetadataKind::AssociationAttribute);
        let mut builder = open(&mut store);
        let mut batch = builder.create_classes(["Company", "Person"]).unwrap();
        let company = batch.class_id("Company").unwrap();
        let person = batch.class_id("Person").unwrap();

        let result = batch
            .create_collection_member(company, "Employees", person, None)
            .map(|_| ());

        assert!(matches!(result, Err(BuildError::Store(_))));
        assert!(builder.assembly().get_class("Company").unwrap().members.is_empty());
    }

    #[test]
    fn test_default_class_options_not_idempotent() {
        let mut store = MemoryStore::new();
        let mut builder = open(&mut store);

        builder
            .create_classes(["Invoice", "InvoiceLine"])
            .unwrap()
            .create_default_class_options(|c| c.name == "Invoice")
            .unwrap()
            .create_default_class_options(|c| c.name == "Invoice")
            .unwrap();

        let assembly = builder.assembly();
        assert_eq!(assembly.get_class("Invoice").unwrap().default_class_options_count(), 2);
        assert_eq!(
            assembly.get_class("InvoiceLine").unwrap().default_class_options_count(),
            0
        );
    }
}
