#![forbid(unsafe_code)]

//! [`Resource`] implementations for every backend entity.
//!
//! Orders and departments are read-only views; the rest pair their
//! table with a form from [`crate::forms`].

use atelier_client::{
    Address, Company, Contact, Department, LookupValue, Metal, MetalDeposit, Order, Role, Supply,
};
use atelier_widgets::block::Alignment;
use atelier_widgets::table::CellValue;
use atelier_widgets::{Breakpoint, Column};

use super::Resource;
use crate::forms::{self, FormMode};

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn opt_text(value: Option<&str>) -> CellValue {
    value.map_or(CellValue::Empty, text)
}

fn id_column<R: Resource>() -> Column<R> {
    Column::new("id", "ID", |row: &R| CellValue::Number(row.id() as f64))
        .sortable()
        .width(6)
        .align(Alignment::Right)
}

impl Resource for Company {
    const ROUTE: &'static str = "companies";
    const TITLE: &'static str = "Companies";
    const SINGULAR: &'static str = "company";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("name", "Name", |c: &Self| text(&c.name)).sortable(),
            Column::new("email", "Email", |c: &Self| opt_text(c.email.as_deref()))
                .sortable()
                .min_breakpoint(Breakpoint::Tablet),
            Column::new("phone", "Phone", |c: &Self| opt_text(c.phone.as_deref()))
                .min_breakpoint(Breakpoint::Desktop),
        ]
    }

    fn form(mode: FormMode<'_, Self>) -> Option<atelier_widgets::modal::FormModalEntry> {
        Some(forms::company::modal(mode))
    }
}

impl Resource for Contact {
    const ROUTE: &'static str = "contacts";
    const TITLE: &'static str = "Contacts";
    const SINGULAR: &'static str = "contact";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("name", "Name", |c: &Self| text(&c.full_name())).sortable(),
            Column::new("email", "Email", |c: &Self| opt_text(c.email.as_deref()))
                .min_breakpoint(Breakpoint::Tablet),
            Column::new("phone", "Phone", |c: &Self| opt_text(c.phone.as_deref()))
                .min_breakpoint(Breakpoint::Desktop),
            Column::new("company_id", "Company", |c: &Self| {
                c.company_id
                    .map_or(CellValue::Empty, |id| CellValue::Number(id as f64))
            })
            .sortable()
            .width(9)
            .align(Alignment::Right)
            .min_breakpoint(Breakpoint::Desktop),
        ]
    }

    fn form(mode: FormMode<'_, Self>) -> Option<atelier_widgets::modal::FormModalEntry> {
        Some(forms::contact::modal(mode))
    }
}

impl Resource for Order {
    const ROUTE: &'static str = "orders";
    const TITLE: &'static str = "Orders";
    const SINGULAR: &'static str = "order";
    const CAN_MUTATE: bool = false;

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("number", "Number", |o: &Self| text(&o.number)).sortable(),
            Column::new("status", "Status", |o: &Self| text(&o.status)).sortable(),
            Column::new("company_id", "Company", |o: &Self| {
                o.company_id
                    .map_or(CellValue::Empty, |id| CellValue::Number(id as f64))
            })
            .width(9)
            .align(Alignment::Right)
            .min_breakpoint(Breakpoint::Tablet),
            Column::new("created_at", "Created", |o: &Self| {
                text(&o.created_at.format("%Y-%m-%d").to_string())
            })
            .sortable()
            .width(12)
            .min_breakpoint(Breakpoint::Tablet),
        ]
    }

    fn form(_mode: FormMode<'_, Self>) -> Option<atelier_widgets::modal::FormModalEntry> {
        None
    }
}

impl Resource for Metal {
    const ROUTE: &'static str = "metals";
    const TITLE: &'static str = "Metals";
    const SINGULAR: &'static str = "metal";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("name", "Name", |m: &Self| text(&m.name)).sortable(),
            // Stored as a fraction, shown as a percentage.
            Column::new("fine_percentage", "Fineness %", |m: &Self| {
                CellValue::Number(m.fine_percentage * 100.0)
            })
            .sortable()
            .width(12)
            .align(Alignment::Right),
        ]
    }

    fn form(mode: FormMode<'_, Self>) -> Option<atelier_widgets::modal::FormModalEntry> {
        Some(forms::metal::modal(mode))
    }
}

impl Resource for Role {
    const ROUTE: &'static str = "roles";
    const TITLE: &'static str = "Roles";
    const SINGULAR: &'static str = "role";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("name", "Name", |r: &Self| text(&r.name)).sortable(),
        ]
    }

    fn form(mode: FormMode<'_, Self>) -> Option<atelier_widgets::modal::FormModalEntry> {
        Some(forms::role::modal(mode))
    }
}

impl Resource for Department {
    const ROUTE: &'static str = "departments";
    const TITLE: &'static str = "Departments";
    const SINGULAR: &'static str = "department";
    const CAN_MUTATE: bool = false;

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("name", "Name", |d: &Self| text(&d.name)).sortable(),
        ]
    }

    fn form(_mode: FormMode<'_, Self>) -> Option<atelier_widgets::modal::FormModalEntry> {
        None
    }
}

impl Resource for Supply {
    const ROUTE: &'static str = "supplies";
    const TITLE: &'static str = "Supplies";
    const SINGULAR: &'static str = "supply";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("name", "Name", |s: &Self| text(&s.name)).sortable(),
            Column::new("quantity", "Quantity", |s: &Self| {
                CellValue::Number(s.quantity)
            })
            .sortable()
            .width(10)
            .align(Alignment::Right),
            Column::new("unit", "Unit", |s: &Self| opt_text(s.unit.as_deref())).width(6),
        ]
    }

    fn form(mode: FormMode<'_, Self>) -> Option<atelier_widgets::modal::FormModalEntry> {
        Some(forms::supply::modal(mode))
    }
}

impl Resource for LookupValue {
    const ROUTE: &'static str = "lookup-values";
    const TITLE: &'static str = "Lookup Values";
    const SINGULAR: &'static str = "lookup value";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("category", "Category", |v: &Self| text(&v.category)).sortable(),
            Column::new("value", "Value", |v: &Self| text(&v.value)).sortable(),
        ]
    }

    fn form(mode: FormMode<'_, Self>) -> Option<atelier_widgets::modal::FormModalEntry> {
        Some(forms::lookup_value::modal(mode))
    }
}

impl Resource for Address {
    const ROUTE: &'static str = "addresses";
    const TITLE: &'static str = "Addresses";
    const SINGULAR: &'static str = "address";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("street", "Street", |a: &Self| text(&a.street)).sortable(),
            Column::new("city", "City", |a: &Self| text(&a.city)).sortable(),
            Column::new("state", "State", |a: &Self| opt_text(a.state.as_deref()))
                .width(7)
                .min_breakpoint(Breakpoint::Tablet),
            Column::new("zip", "ZIP", |a: &Self| text(&a.zip)).width(8),
            Column::new("country", "Country", |a: &Self| {
                opt_text(a.country.as_deref())
            })
            .min_breakpoint(Breakpoint::Desktop),
        ]
    }

    fn form(mode: FormMode<'_, Self>) -> Option<atelier_widgets::modal::FormModalEntry> {
        Some(forms::address::modal(mode))
    }
}

impl Resource for MetalDeposit {
    const ROUTE: &'static str = "metal-deposits";
    const TITLE: &'static str = "Metal Deposits";
    const SINGULAR: &'static str = "deposit";

    fn id(&self) -> i64 {
        self.id
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            id_column(),
            Column::new("metal_id", "Metal", |d: &Self| {
                CellValue::Number(d.metal_id as f64)
            })
            .sortable()
            .width(7)
            .align(Alignment::Right),
            Column::new("grams", "Grams", |d: &Self| CellValue::Number(d.grams))
                .sortable()
                .width(10)
                .align(Alignment::Right),
            Column::new("deposited_at", "Deposited", |d: &Self| {
                text(&d.deposited_at.format("%Y-%m-%d %H:%M").to_string())
            })
            .sortable()
            .width(18)
            .min_breakpoint(Breakpoint::Tablet),
        ]
    }

    fn form(mode: FormMode<'_, Self>) -> Option<atelier_widgets::modal::FormModalEntry> {
        Some(forms::metal_deposit::modal(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::{MutationIntent, PageCommand, PageView, ResourcePage};
    use atelier_client::Paged;
    use atelier_core::event::{Event, KeyCode, KeyEvent};

    fn role_page_with_rows() -> ResourcePage<Role> {
        let mut page = ResourcePage::new(25);
        let paged = Paged {
            items: vec![
                serde_json::json!({"id": 1, "name": "Goldsmith"}),
                serde_json::json!({"id": 2, "name": "Polisher"}),
            ],
            total: 2,
        };
        page.apply_fetch(Ok(paged));
        page
    }

    #[test]
    fn fetch_fills_rows_and_total() {
        let page = role_page_with_rows();
        assert_eq!(page.rows().len(), 2);
        assert_eq!(page.pager().total(), 2);
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let mut page = ResourcePage::<Role>::new(25);
        let paged = Paged {
            items: vec![
                serde_json::json!({"id": 1, "name": "Goldsmith"}),
                serde_json::json!({"id": "not-a-number"}),
            ],
            total: 2,
        };
        page.apply_fetch(Ok(paged));
        assert_eq!(page.rows().len(), 1);
    }

    #[test]
    fn fetch_error_keeps_previous_rows() {
        let mut page = role_page_with_rows();
        page.apply_fetch(Err(atelier_client::ApiError::Status {
            status: 500,
            message: String::from("boom"),
        }));
        assert_eq!(page.rows().len(), 2);
    }

    #[test]
    fn delete_targets_selection_over_cursor() {
        let mut page = role_page_with_rows();
        let select_all = Event::Key(KeyEvent::new(KeyCode::Char('a')));
        let _ = page.handle_event(&select_all, None);

        let delete = Event::Key(KeyEvent::new(KeyCode::Char('d')));
        let PageCommand::OpenConfirm { intent, .. } = page.handle_event(&delete, None) else {
            panic!("expected a confirm command");
        };
        assert_eq!(
            intent,
            MutationIntent::Delete {
                resource: "roles",
                ids: vec![1, 2],
            }
        );
    }

    #[test]
    fn delete_without_selection_uses_cursor_row() {
        let mut page = role_page_with_rows();
        let delete = Event::Key(KeyEvent::new(KeyCode::Delete));
        let PageCommand::OpenConfirm { intent, .. } = page.handle_event(&delete, None) else {
            panic!("expected a confirm command");
        };
        assert_eq!(
            intent,
            MutationIntent::Delete {
                resource: "roles",
                ids: vec![1],
            }
        );
    }

    #[test]
    fn edit_opens_seeded_form() {
        let mut page = role_page_with_rows();
        let edit = Event::Key(KeyEvent::new(KeyCode::Enter));
        let PageCommand::OpenForm { entry, intent } = page.handle_event(&edit, None) else {
            panic!("expected a form command");
        };
        assert_eq!(entry.state().text_value("name"), Some("Goldsmith"));
        assert_eq!(
            intent,
            MutationIntent::Update {
                resource: "roles",
                id: 1,
            }
        );
    }

    #[test]
    fn read_only_resources_ignore_mutating_keys() {
        let mut page = ResourcePage::<Department>::new(25);
        let paged = Paged {
            items: vec![serde_json::json!({"id": 5, "name": "Casting"})],
            total: 1,
        };
        page.apply_fetch(Ok(paged));

        let delete = Event::Key(KeyEvent::new(KeyCode::Char('d')));
        assert!(matches!(
            page.handle_event(&delete, None),
            PageCommand::None
        ));
        let create = Event::Key(KeyEvent::new(KeyCode::Char('n')));
        assert!(matches!(
            page.handle_event(&create, None),
            PageCommand::None
        ));
    }

    #[test]
    fn paging_keys_emit_fetch() {
        let mut page = ResourcePage::<Role>::new(10);
        let paged = Paged {
            items: (1..=10)
                .map(|i| serde_json::json!({"id": i, "name": format!("Role {i}")}))
                .collect(),
            total: 25,
        };
        page.apply_fetch(Ok(paged));

        let right = Event::Key(KeyEvent::new(KeyCode::Right));
        assert!(matches!(page.handle_event(&right, None), PageCommand::Fetch));
        assert_eq!(page.pager().current(), 2);

        let left = Event::Key(KeyEvent::new(KeyCode::Left));
        assert!(matches!(page.handle_event(&left, None), PageCommand::Fetch));
        assert_eq!(page.pager().current(), 1);
    }
}
