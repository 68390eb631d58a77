use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::validation::ValidationError;

/// The two record types exposed over the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Product,
    Task,
}

/// Storage operations, used to pick the generic message shown when one fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Count,
    Fetch,
    Create,
    Update,
    Delete,
}

impl ResourceKind {
    pub fn invalid_id_message(self) -> &'static str {
        match self {
            ResourceKind::Product => "ID du produit invalide",
            ResourceKind::Task => "ID de la tâche invalide",
        }
    }

    pub fn not_found_message(self) -> &'static str {
        match self {
            ResourceKind::Product => "Produit non trouvé",
            ResourceKind::Task => "Tâche non trouvée",
        }
    }

    pub fn required_field_message(self) -> &'static str {
        match self {
            ResourceKind::Product => "Le nom du produit est requis et doit être une chaîne non vide",
            ResourceKind::Task => "Le titre de la tâche est requis et doit être une chaîne non vide",
        }
    }

    pub fn found_message(self) -> &'static str {
        match self {
            ResourceKind::Product => "Produit trouvé",
            ResourceKind::Task => "Tâche trouvée",
        }
    }

    pub fn created_message(self) -> &'static str {
        match self {
            ResourceKind::Product => "Produit créé avec succès",
            ResourceKind::Task => "Tâche créée avec succès",
        }
    }

    pub fn updated_message(self) -> &'static str {
        match self {
            ResourceKind::Product => "Produit modifié avec succès",
            ResourceKind::Task => "Tâche modifiée avec succès",
        }
    }

    pub fn deleted_message(self, label: &str) -> String {
        match self {
            ResourceKind::Product => format!("Produit \"{}\" supprimé avec succès", label),
            ResourceKind::Task => format!("Tâche \"{}\" supprimée avec succès", label),
        }
    }

    pub fn listed_message(self, n: usize) -> String {
        match self {
            ResourceKind::Product => format!("{} produit(s) trouvé(s)", n),
            ResourceKind::Task => format!("{} tâche(s) trouvée(s)", n),
        }
    }

    pub fn counted_message(self, n: i64) -> String {
        match self {
            ResourceKind::Product => format!("{} produit(s) en base", n),
            ResourceKind::Task => format!("{} tâche(s) en base", n),
        }
    }

    /// Generic client-facing message for a failed storage operation.
    pub fn failure_message(self, op: Operation) -> &'static str {
        match (self, op) {
            (ResourceKind::Product, Operation::List) => "Erreur lors de la récupération des produits",
            (ResourceKind::Product, Operation::Count) => "Erreur lors du comptage des produits",
            (ResourceKind::Product, Operation::Fetch) => "Erreur lors de la récupération du produit",
            (ResourceKind::Product, Operation::Create) => "Erreur lors de la création du produit",
            (ResourceKind::Product, Operation::Update) => "Erreur lors de la modification du produit",
            (ResourceKind::Product, Operation::Delete) => "Erreur lors de la suppression du produit",
            (ResourceKind::Task, Operation::List) => "Erreur lors de la récupération des tâches",
            (ResourceKind::Task, Operation::Count) => "Erreur lors du comptage des tâches",
            (ResourceKind::Task, Operation::Fetch) => "Erreur lors de la récupération de la tâche",
            (ResourceKind::Task, Operation::Create) => "Erreur lors de la création de la tâche",
            (ResourceKind::Task, Operation::Update) => "Erreur lors de la modification de la tâche",
            (ResourceKind::Task, Operation::Delete) => "Erreur lors de la suppression de la tâche",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResourceKind::Product => write!(f, "product"),
            ResourceKind::Task => write!(f, "task"),
        }
    }
}

/// A record type managed through the generic create/read/update/delete pipeline.
///
/// `validate` is the resource validator: it turns a raw JSON body into the
/// normalized `Input` or a typed `ValidationError`, before any storage write.
pub trait Resource: Serialize + Clone + Send + Sync + 'static {
    type Input: Clone + fmt::Debug + Send + Sync + 'static;

    const KIND: ResourceKind;

    fn id(&self) -> i32;

    /// Human-readable name used in the deletion message.
    fn label(&self) -> &str;

    fn validate(body: &Value) -> Result<Self::Input, ValidationError>;

    /// Builds a fresh record; used by storage backends that manage ids themselves.
    fn from_input(id: i32, input: Self::Input, now: DateTime<Utc>) -> Self;

    /// Replaces the mutable fields and bumps `updated_at`.
    fn apply(&mut self, input: Self::Input, now: DateTime<Utc>);

    fn created_at(&self) -> DateTime<Utc>;
}
