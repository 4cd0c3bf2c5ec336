use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DomainEvent {
    pub name: &'static str,
}
