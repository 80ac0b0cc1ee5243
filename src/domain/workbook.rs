// ==========================================
// Designações RVM - Entidade Apostila
// ==========================================
// Documento fonte (apostila da reunião). O conteúdo é
// carga opaca para o núcleo; apenas o nome importa para a
// enumeração de semanas.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub id: String,
    pub name: String,
    /// Bytes do arquivo em base64; o núcleo nunca interpreta.
    pub file_data: String,
    pub upload_date: DateTime<Utc>,
}

impl Workbook {
    pub fn new(name: impl Into<String>, file_data: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            file_data: file_data.into(),
            upload_date: Utc::now(),
        }
    }
}
