use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError, middleware::auth::UsuarioAutenticado, models::voluntario::Cargo,
};

/// Recursos e ações da tabela de políticas. Todo o controle de acesso por
/// cargo está declarado em `POLITICAS`, avaliada uma vez por requisição
/// pelo extrator `ExigePermissao`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurso {
    Sedes,
    Voluntarios,
    Assistidos,
    Contribuicoes,
    Movimentacoes,
    NotasFiscais,
    Emails,
    Relatorios,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acao {
    Ler,
    Escrever,
}

struct Politica {
    recurso: Recurso,
    acao: Acao,
    cargos: &'static [Cargo],
}

// Presidente e SuperAdmin não aparecem nas listas: têm acesso global
// (ver `Cargo::acesso_global`).
const POLITICAS: &[Politica] = &[
    Politica {
        recurso: Recurso::Sedes,
        acao: Acao::Ler,
        cargos: &[Cargo::Voluntario, Cargo::Secretario, Cargo::Tesoureiro],
    },
    Politica {
        recurso: Recurso::Sedes,
        acao: Acao::Escrever,
        cargos: &[],
    },
    Politica {
        recurso: Recurso::Voluntarios,
        acao: Acao::Ler,
        cargos: &[Cargo::Secretario, Cargo::Tesoureiro],
    },
    Politica {
        recurso: Recurso::Voluntarios,
        acao: Acao::Escrever,
        cargos: &[Cargo::Secretario],
    },
    Politica {
        recurso: Recurso::Assistidos,
        acao: Acao::Ler,
        cargos: &[Cargo::Secretario, Cargo::Tesoureiro],
    },
    Politica {
        recurso: Recurso::Assistidos,
        acao: Acao::Escrever,
        cargos: &[Cargo::Secretario],
    },
    Politica {
        recurso: Recurso::Contribuicoes,
        acao: Acao::Ler,
        cargos: &[Cargo::Tesoureiro],
    },
    Politica {
        recurso: Recurso::Contribuicoes,
        acao: Acao::Escrever,
        cargos: &[Cargo::Tesoureiro],
    },
    Politica {
        recurso: Recurso::Movimentacoes,
        acao: Acao::Ler,
        cargos: &[Cargo::Tesoureiro],
    },
    Politica {
        recurso: Recurso::Movimentacoes,
        acao: Acao::Escrever,
        cargos: &[Cargo::Tesoureiro],
    },
    Politica {
        recurso: Recurso::NotasFiscais,
        acao: Acao::Ler,
        cargos: &[Cargo::Tesoureiro],
    },
    Politica {
        recurso: Recurso::NotasFiscais,
        acao: Acao::Escrever,
        cargos: &[Cargo::Tesoureiro],
    },
    Politica {
        recurso: Recurso::Emails,
        acao: Acao::Ler,
        cargos: &[Cargo::Secretario],
    },
    Politica {
        recurso: Recurso::Emails,
        acao: Acao::Escrever,
        cargos: &[Cargo::Secretario],
    },
    Politica {
        recurso: Recurso::Relatorios,
        acao: Acao::Ler,
        cargos: &[Cargo::Tesoureiro],
    },
];

pub fn permite(recurso: Recurso, acao: Acao, cargo: Cargo) -> bool {
    if cargo.acesso_global() {
        return true;
    }
    POLITICAS
        .iter()
        .find(|p| p.recurso == recurso && p.acao == acao)
        .map(|p| p.cargos.contains(&cargo))
        .unwrap_or(false)
}

/// O trait que define o que uma permissão exige
pub trait PermissaoDef: Send + Sync + 'static {
    const RECURSO: Recurso;
    const ACAO: Acao;
}

/// O extrator (guardião): consulta a tabela de políticas para o usuário
/// autenticado antes do handler rodar.
pub struct ExigePermissao<T: PermissaoDef>(PhantomData<T>);

impl<T, S> FromRequestParts<S> for ExigePermissao<T>
where
    T: PermissaoDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let usuario = parts
            .extensions
            .get::<UsuarioAutenticado>()
            .ok_or(AppError::TokenInvalido)?;

        if !permite(T::RECURSO, T::ACAO, usuario.0.cargo) {
            return Err(AppError::AcessoNegado(
                "Seu cargo não permite realizar esta ação".to_string(),
            ));
        }

        Ok(ExigePermissao(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permissao {
    ($nome:ident, $recurso:expr, $acao:expr) => {
        pub struct $nome;
        impl PermissaoDef for $nome {
            const RECURSO: Recurso = $recurso;
            const ACAO: Acao = $acao;
        }
    };
}

permissao!(LerSedes, Recurso::Sedes, Acao::Ler);
permissao!(EscreverSedes, Recurso::Sedes, Acao::Escrever);
permissao!(LerVoluntarios, Recurso::Voluntarios, Acao::Ler);
permissao!(EscreverVoluntarios, Recurso::Voluntarios, Acao::Escrever);
permissao!(LerAssistidos, Recurso::Assistidos, Acao::Ler);
permissao!(EscreverAssistidos, Recurso::Assistidos, Acao::Escrever);
permissao!(LerContribuicoes, Recurso::Contribuicoes, Acao::Ler);
permissao!(EscreverContribuicoes, Recurso::Contribuicoes, Acao::Escrever);
permissao!(LerMovimentacoes, Recurso::Movimentacoes, Acao::Ler);
permissao!(EscreverMovimentacoes, Recurso::Movimentacoes, Acao::Escrever);
permissao!(LerNotasFiscais, Recurso::NotasFiscais, Acao::Ler);
permissao!(EscreverNotasFiscais, Recurso::NotasFiscais, Acao::Escrever);
permissao!(LerEmails, Recurso::Emails, Acao::Ler);
permissao!(EscreverEmails, Recurso::Emails, Acao::Escrever);
permissao!(LerRelatorios, Recurso::Relatorios, Acao::Ler);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tesoureiro_opera_financeiro_mas_nao_cadastros() {
        assert!(permite(Recurso::Contribuicoes, Acao::Escrever, Cargo::Tesoureiro));
        assert!(permite(Recurso::Movimentacoes, Acao::Escrever, Cargo::Tesoureiro));
        assert!(permite(Recurso::Relatorios, Acao::Ler, Cargo::Tesoureiro));
        assert!(!permite(Recurso::Voluntarios, Acao::Escrever, Cargo::Tesoureiro));
        assert!(!permite(Recurso::Emails, Acao::Escrever, Cargo::Tesoureiro));
    }

    #[test]
    fn secretario_cuida_de_cadastros_e_emails() {
        assert!(permite(Recurso::Voluntarios, Acao::Escrever, Cargo::Secretario));
        assert!(permite(Recurso::Emails, Acao::Escrever, Cargo::Secretario));
        assert!(!permite(Recurso::Contribuicoes, Acao::Ler, Cargo::Secretario));
    }

    #[test]
    fn voluntario_comum_so_enxerga_sedes() {
        assert!(permite(Recurso::Sedes, Acao::Ler, Cargo::Voluntario));
        assert!(!permite(Recurso::Sedes, Acao::Escrever, Cargo::Voluntario));
        assert!(!permite(Recurso::Voluntarios, Acao::Ler, Cargo::Voluntario));
    }

    #[test]
    fn cargos_globais_passam_em_tudo() {
        for cargo in [Cargo::Presidente, Cargo::SuperAdmin] {
            assert!(permite(Recurso::Sedes, Acao::Escrever, cargo));
            assert!(permite(Recurso::Contribuicoes, Acao::Escrever, cargo));
            assert!(permite(Recurso::Emails, Acao::Escrever, cargo));
        }
    }
}
