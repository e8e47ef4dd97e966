use serde::Serialize;

use crate::common::paginacao::{MetaPaginacao, Paginado};

/// Envelope padrão de resposta da API:
/// `{ success, data?, message?, pagination? }`.
#[derive(Debug, Serialize)]
pub struct RespostaApi<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<MetaPaginacao>,
}

impl<T: Serialize> RespostaApi<T> {
    pub fn dados(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    pub fn dados_com_mensagem(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            pagination: None,
        }
    }
}

impl<T: Serialize> RespostaApi<Vec<T>> {
    pub fn de_pagina(pagina: Paginado<T>) -> Self {
        Self {
            success: true,
            data: Some(pagina.data),
            message: None,
            pagination: Some(pagina.pagination),
        }
    }
}

impl RespostaApi<()> {
    pub fn mensagem(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }
    }
}
