use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const LIMITE_PADRAO: i64 = 10;
pub const LIMITE_MAXIMO: i64 = 100;

/// Parâmetros de paginação aceitos por todas as listagens.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ParamsPaginacao {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub order_by: Option<String>,
    pub order_direction: Option<DirecaoOrdenacao>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DirecaoOrdenacao {
    Asc,
    #[default]
    Desc,
}

impl DirecaoOrdenacao {
    pub fn sql(self) -> &'static str {
        match self {
            DirecaoOrdenacao::Asc => "ASC",
            DirecaoOrdenacao::Desc => "DESC",
        }
    }
}

impl ParamsPaginacao {
    /// Normaliza page/limit para valores seguros e devolve (page, limit, offset).
    pub fn normalizar(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(LIMITE_PADRAO).clamp(1, LIMITE_MAXIMO);
        (page, limit, (page - 1) * limit)
    }

    /// Resolve a coluna de ordenação contra a lista permitida da entidade.
    /// Nomes fora da lista caem no padrão (proteção contra injeção).
    pub fn coluna_ordenacao(&self, permitidas: &[(&str, &str)], padrao: &'static str) -> String {
        match &self.order_by {
            Some(pedido) => permitidas
                .iter()
                .find(|(nome, _)| *nome == pedido)
                .map(|(_, coluna)| coluna.to_string())
                .unwrap_or_else(|| padrao.to_string()),
            None => padrao.to_string(),
        }
    }

    pub fn direcao(&self) -> DirecaoOrdenacao {
        self.order_direction.unwrap_or_default()
    }
}

/// Intervalo de datas opcional usado em consultas e relatórios.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ParamsPeriodo {
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

/// Metadados de paginação devolvidos no envelope de resposta.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetaPaginacao {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl MetaPaginacao {
    pub fn nova(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit.max(1),
        }
    }
}

/// Uma página de resultados junto com seus metadados.
#[derive(Debug, Clone, Serialize)]
pub struct Paginado<T> {
    pub data: Vec<T>,
    pub pagination: MetaPaginacao,
}

impl<T> Paginado<T> {
    pub fn novo(data: Vec<T>, page: i64, limit: i64, total: i64) -> Self {
        Self {
            data,
            pagination: MetaPaginacao::nova(page, limit, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizar_aplica_padroes_e_limites() {
        let params = ParamsPaginacao::default();
        assert_eq!(params.normalizar(), (1, 10, 0));

        let params = ParamsPaginacao {
            page: Some(3),
            limit: Some(500),
            ..Default::default()
        };
        // limite estoura o teto de 100; offset acompanha
        assert_eq!(params.normalizar(), (3, 100, 200));
    }

    #[test]
    fn coluna_fora_da_lista_cai_no_padrao() {
        let params = ParamsPaginacao {
            order_by: Some("senha; DROP TABLE voluntarios".to_string()),
            ..Default::default()
        };
        let coluna = params.coluna_ordenacao(&[("nomeCompleto", "nome_completo")], "criado_em");
        assert_eq!(coluna, "criado_em");
    }

    #[test]
    fn meta_calcula_total_de_paginas() {
        assert_eq!(MetaPaginacao::nova(1, 10, 25).pages, 3);
        assert_eq!(MetaPaginacao::nova(1, 10, 0).pages, 0);
    }
}
