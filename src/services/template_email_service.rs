use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{Paginado, ParamsPaginacao},
    db::EmailRepository,
    models::email::{
        AtualizarTemplateEmail, CriarTemplateEmail, FiltroTemplateEmail, TemplateEmail,
        TemplateRenderizado, TipoTemplateEmail,
    },
};

#[derive(Clone)]
pub struct TemplateEmailService {
    repo: EmailRepository,
}

impl TemplateEmailService {
    pub fn new(repo: EmailRepository) -> Self {
        Self { repo }
    }

    pub async fn criar(&self, dados: CriarTemplateEmail) -> Result<TemplateEmail, AppError> {
        if self.repo.buscar_template_por_nome(&dados.nome).await?.is_some() {
            return Err(AppError::Conflito(
                "Já existe um template com este nome".to_string(),
            ));
        }

        validar_marcadores(&dados.corpo)?;
        validar_marcadores(&dados.assunto)?;

        self.repo.criar_template(&dados, true).await
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<TemplateEmail, AppError> {
        self.repo
            .buscar_template_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Template de email não encontrado".to_string()))
    }

    pub async fn buscar_por_nome(&self, nome: &str) -> Result<TemplateEmail, AppError> {
        self.repo
            .buscar_template_por_nome(nome)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Template de email não encontrado".to_string()))
    }

    pub async fn listar(
        &self,
        filtro: FiltroTemplateEmail,
        paginacao: ParamsPaginacao,
    ) -> Result<Paginado<TemplateEmail>, AppError> {
        let (page, limit, _) = paginacao.normalizar();
        let (templates, total) = self.repo.listar_templates(&filtro, &paginacao).await?;
        Ok(Paginado::novo(templates, page, limit, total))
    }

    pub async fn listar_por_tipo(
        &self,
        tipo: TipoTemplateEmail,
    ) -> Result<Vec<TemplateEmail>, AppError> {
        self.repo.listar_templates_por_tipo(tipo).await
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: AtualizarTemplateEmail,
    ) -> Result<TemplateEmail, AppError> {
        let existente = self.buscar_por_id(id).await?;

        if let Some(nome) = &dados.nome {
            if *nome != existente.nome
                && self.repo.buscar_template_por_nome(nome).await?.is_some()
            {
                return Err(AppError::Conflito(
                    "Já existe um template com este nome".to_string(),
                ));
            }
        }
        if let Some(corpo) = &dados.corpo {
            validar_marcadores(corpo)?;
        }
        if let Some(assunto) = &dados.assunto {
            validar_marcadores(assunto)?;
        }

        self.repo.atualizar_template(id, &dados).await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.buscar_por_id(id).await?;
        self.repo.excluir_template(id).await
    }

    pub async fn ativar_desativar(&self, id: Uuid, ativo: bool) -> Result<TemplateEmail, AppError> {
        self.buscar_por_id(id).await?;
        self.repo.definir_template_ativo(id, ativo).await
    }

    /// Cópia do template com outro nome; a cópia nasce desativada.
    pub async fn duplicar(&self, id: Uuid, novo_nome: &str) -> Result<TemplateEmail, AppError> {
        let original = self.buscar_por_id(id).await?;

        if self.repo.buscar_template_por_nome(novo_nome).await?.is_some() {
            return Err(AppError::Conflito(
                "Já existe um template com este nome".to_string(),
            ));
        }

        self.repo
            .criar_template(
                &CriarTemplateEmail {
                    nome: novo_nome.to_string(),
                    assunto: original.assunto,
                    corpo: original.corpo,
                    tipo: original.tipo,
                },
                false,
            )
            .await
    }

    /// Aplica os dados ao assunto e ao corpo do template.
    pub async fn renderizar(
        &self,
        id: Uuid,
        dados: &HashMap<String, serde_json::Value>,
    ) -> Result<TemplateRenderizado, AppError> {
        let template = self.buscar_por_id(id).await?;

        if !template.ativo {
            return Err(AppError::Invalido("Template está inativo".to_string()));
        }

        Ok(TemplateRenderizado {
            assunto: substituir_marcadores(&template.assunto, dados),
            corpo: substituir_marcadores(&template.corpo, dados),
            template,
        })
    }

    /// Garante os templates padrão no primeiro boot. Idempotente.
    pub async fn criar_templates_padrao(&self) -> Result<usize, AppError> {
        let mut criados = 0;
        for template in templates_padrao() {
            if self
                .repo
                .buscar_template_por_nome(&template.nome)
                .await?
                .is_none()
            {
                self.repo.criar_template(&template, true).await?;
                criados += 1;
            }
        }
        if criados > 0 {
            tracing::info!(criados, "templates de email padrão criados");
        }
        Ok(criados)
    }
}

/// Substitui cada `{{chave}}` pelo valor correspondente. Marcadores sem
/// valor ficam intactos para facilitar a depuração do template.
pub fn substituir_marcadores(
    texto: &str,
    dados: &HashMap<String, serde_json::Value>,
) -> String {
    let mut resultado = texto.to_string();
    for (chave, valor) in dados {
        let marcador = format!("{{{{{}}}}}", chave);
        let texto_valor = match valor {
            serde_json::Value::String(s) => s.clone(),
            outro => outro.to_string(),
        };
        resultado = resultado.replace(&marcador, &texto_valor);
    }
    resultado
}

/// Todo `{{` precisa do `}}` correspondente.
pub fn validar_marcadores(texto: &str) -> Result<(), AppError> {
    let mut restante = texto;
    while let Some(posicao) = restante.find("{{") {
        match restante[posicao..].find("}}") {
            Some(fim) => restante = &restante[posicao + fim + 2..],
            None => {
                return Err(AppError::Invalido(
                    "Template inválido: marcador sem fechamento".to_string(),
                ));
            }
        }
    }
    Ok(())
}

fn templates_padrao() -> Vec<CriarTemplateEmail> {
    vec![
        CriarTemplateEmail {
            nome: "cobranca-mensal".to_string(),
            assunto: "SERFO - Contribuição de {{mes}}/{{ano}}".to_string(),
            corpo: "<h2>Olá, {{nomeCompleto}}!</h2>\
                    <p>Sua contribuição mensal de <strong>{{valor}}</strong> está disponível para pagamento.</p>\
                    <p><strong>Vencimento:</strong> {{dataVencimento}}</p>\
                    <p>Para efetuar o pagamento, utilize os dados abaixo:</p>\
                    <ul>\
                    <li><strong>PIX:</strong> {{pixChave}}</li>\
                    <li><strong>Banco:</strong> {{banco}}</li>\
                    <li><strong>Agência:</strong> {{agencia}}</li>\
                    <li><strong>Conta:</strong> {{conta}}</li>\
                    </ul>\
                    <p>Atenciosamente,<br>Equipe SERFO</p>"
                .to_string(),
            tipo: TipoTemplateEmail::Cobranca,
        },
        CriarTemplateEmail {
            nome: "lembrete-vencimento".to_string(),
            assunto: "SERFO - Lembrete: Contribuição vence em 3 dias".to_string(),
            corpo: "<h2>Olá, {{nomeCompleto}}!</h2>\
                    <p>Este é um lembrete de que sua contribuição de <strong>{{valor}}</strong> vence em 3 dias.</p>\
                    <p><strong>Data de vencimento:</strong> {{dataVencimento}}</p>\
                    <p>Para evitar atrasos, efetue o pagamento o quanto antes.</p>\
                    <p>Atenciosamente,<br>Equipe SERFO</p>"
                .to_string(),
            tipo: TipoTemplateEmail::Lembrete,
        },
        CriarTemplateEmail {
            nome: "agradecimento-pagamento".to_string(),
            assunto: "SERFO - Pagamento recebido com sucesso!".to_string(),
            corpo: "<h2>Olá, {{nomeCompleto}}!</h2>\
                    <p>Recebemos seu pagamento de <strong>{{valor}}</strong> em {{dataPagamento}}.</p>\
                    <p>Sua nota fiscal está em anexo.</p>\
                    <p>Agradecemos sua contribuição!</p>\
                    <p>Atenciosamente,<br>Equipe SERFO</p>"
                .to_string(),
            tipo: TipoTemplateEmail::Agradecimento,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitui_todos_os_marcadores() {
        let mut dados = HashMap::new();
        dados.insert("nomeCompleto".to_string(), json!("Maria"));
        dados.insert("valor".to_string(), json!("R$ 50,00"));

        let texto = substituir_marcadores("Olá {{nomeCompleto}}, valor: {{valor}}", &dados);
        assert_eq!(texto, "Olá Maria, valor: R$ 50,00");
    }

    #[test]
    fn marcador_repetido_e_substituido_em_todas_as_ocorrencias() {
        let mut dados = HashMap::new();
        dados.insert("nome".to_string(), json!("Ana"));

        let texto = substituir_marcadores("{{nome}} e {{nome}}", &dados);
        assert_eq!(texto, "Ana e Ana");
    }

    #[test]
    fn marcador_sem_valor_fica_intacto() {
        let dados = HashMap::new();
        let texto = substituir_marcadores("Olá {{nome}}", &dados);
        assert_eq!(texto, "Olá {{nome}}");
    }

    #[test]
    fn valores_nao_textuais_sao_serializados() {
        let mut dados = HashMap::new();
        dados.insert("dias".to_string(), json!(3));

        assert_eq!(substituir_marcadores("vence em {{dias}} dias", &dados), "vence em 3 dias");
    }

    #[test]
    fn marcador_aberto_e_rejeitado() {
        assert!(validar_marcadores("Olá {{nome").is_err());
        assert!(validar_marcadores("Olá {{nome}}, tudo bem?").is_ok());
        assert!(validar_marcadores("sem marcadores").is_ok());
    }

    #[test]
    fn templates_padrao_sao_validos() {
        for template in templates_padrao() {
            assert!(validar_marcadores(&template.assunto).is_ok());
            assert!(validar_marcadores(&template.corpo).is_ok());
        }
    }
}
