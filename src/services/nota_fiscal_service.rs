use chrono::{DateTime, Datelike, Utc};
use genpdf::{Element, elements, style};
use image::Luma;
use qrcode::QrCode;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{Paginado, ParamsPaginacao, ParamsPeriodo},
    db::{ContribuicaoRepository, NotaFiscalRepository},
    models::contribuicao::{ContribuicaoDetalhada, StatusContribuicao},
    models::email::EnviarEmailPayload,
    models::nota_fiscal::{
        AtualizarNotaFiscal, CriarNotaFiscal, DadosPdfNota, ErroLote, EstatisticasNotasFiscais,
        FiltroNotaFiscal, GerarLotePayload, NotaFiscal, NotaFiscalDetalhada, ResultadoLote,
        ResultadoPdf, StatusNotaFiscal,
    },
    services::configuracao_service::ConfiguracaoService,
    services::contribuicao_service::formatar_percentual,
    services::email_service::EmailService,
};

// Emissões concorrentes disputam o mesmo número; o índice único em `numero`
// derruba o perdedor e a emissão é refeita com o número seguinte.
const MAX_TENTATIVAS_NUMERACAO: u32 = 3;

#[derive(Clone)]
pub struct NotaFiscalService {
    repo: NotaFiscalRepository,
    contribuicao_repo: ContribuicaoRepository,
    configuracoes: ConfiguracaoService,
    email_service: EmailService,
    pool: PgPool,
}

impl NotaFiscalService {
    pub fn new(
        repo: NotaFiscalRepository,
        contribuicao_repo: ContribuicaoRepository,
        configuracoes: ConfiguracaoService,
        email_service: EmailService,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            contribuicao_repo,
            configuracoes,
            email_service,
            pool,
        }
    }

    /// Emite a nota de uma contribuição paga. A leitura do último número e
    /// a inserção acontecem na mesma transação; se duas emissões disputarem
    /// o mesmo número, o índice único resolve e a perdedora tenta de novo.
    pub async fn criar(&self, dados: CriarNotaFiscal) -> Result<NotaFiscal, AppError> {
        let contribuicao = self
            .contribuicao_repo
            .buscar_detalhada_por_id(dados.contribuicao_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Contribuição não encontrada".to_string()))?;

        if contribuicao.contribuicao.status != StatusContribuicao::Pago {
            return Err(AppError::Invalido(
                "Apenas contribuições pagas podem gerar nota fiscal".to_string(),
            ));
        }

        if self
            .repo
            .existe_para_contribuicao(dados.contribuicao_id)
            .await?
        {
            return Err(AppError::Conflito(
                "Já existe uma nota fiscal para esta contribuição".to_string(),
            ));
        }

        let ano = Utc::now().year();

        for tentativa in 0..MAX_TENTATIVAS_NUMERACAO {
            let mut tx = self.pool.begin().await?;
            let ultimo = self.repo.ultimo_numero(&mut *tx).await?;
            let numero = gerar_proximo_numero(ultimo.as_deref(), ano);

            match self
                .repo
                .inserir(
                    &mut *tx,
                    &numero,
                    dados.contribuicao_id,
                    contribuicao.contribuicao.valor,
                    dados.observacoes.as_deref(),
                )
                .await
            {
                Ok(nota) => {
                    tx.commit().await?;
                    tracing::info!(numero = %nota.numero, "nota fiscal emitida");
                    return Ok(nota);
                }
                Err(e) => {
                    tx.rollback().await?;
                    match constraint_violada(&e) {
                        Some("notas_fiscais_numero_key") => {
                            tracing::warn!(
                                numero,
                                tentativa,
                                "número de nota disputado, tentando o próximo"
                            );
                            continue;
                        }
                        Some("notas_fiscais_contribuicao_id_key") => {
                            return Err(AppError::Conflito(
                                "Já existe uma nota fiscal para esta contribuição".to_string(),
                            ));
                        }
                        _ => return Err(AppError::BancoDeDados(e)),
                    }
                }
            }
        }

        Err(AppError::Conflito(
            "Não foi possível reservar um número de nota fiscal".to_string(),
        ))
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<NotaFiscalDetalhada, AppError> {
        self.detalhada(id).await
    }

    pub async fn buscar_por_numero(&self, numero: &str) -> Result<NotaFiscalDetalhada, AppError> {
        self.repo
            .buscar_por_numero(numero)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Nota fiscal não encontrada".to_string()))
    }

    pub async fn listar(
        &self,
        filtro: FiltroNotaFiscal,
        periodo: ParamsPeriodo,
        paginacao: ParamsPaginacao,
    ) -> Result<Paginado<NotaFiscalDetalhada>, AppError> {
        let (page, limit, _) = paginacao.normalizar();
        let (notas, total) = self.repo.listar(&filtro, &periodo, &paginacao).await?;
        Ok(Paginado::novo(notas, page, limit, total))
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: AtualizarNotaFiscal,
    ) -> Result<NotaFiscal, AppError> {
        let existente = self
            .repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Nota fiscal não encontrada".to_string()))?;

        // cancelada é terminal
        if existente.status == StatusNotaFiscal::Cancelada
            && dados.status == Some(StatusNotaFiscal::Emitida)
        {
            return Err(AppError::Invalido(
                "Não é possível reativar nota fiscal cancelada".to_string(),
            ));
        }

        self.repo.atualizar(id, &dados).await
    }

    pub async fn cancelar(&self, id: Uuid, motivo: Option<String>) -> Result<NotaFiscal, AppError> {
        let existente = self
            .repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Nota fiscal não encontrada".to_string()))?;

        if existente.status == StatusNotaFiscal::Cancelada {
            return Err(AppError::Conflito(
                "Nota fiscal já está cancelada".to_string(),
            ));
        }

        let observacoes = observacao_cancelamento(
            existente.observacoes.as_deref(),
            motivo.as_deref(),
            Utc::now(),
        );
        self.repo.cancelar(id, &observacoes).await
    }

    /// Emissão em lote: cada contribuição é processada isoladamente e as
    /// falhas não interrompem as demais.
    pub async fn gerar_lote(&self, payload: GerarLotePayload) -> Result<ResultadoLote, AppError> {
        if payload.contribuicao_ids.is_empty() {
            return Err(AppError::Invalido(
                "Lista de contribuições não pode estar vazia".to_string(),
            ));
        }

        let total_processadas = payload.contribuicao_ids.len();
        let mut criadas = Vec::new();
        let mut erros = Vec::new();

        for contribuicao_id in payload.contribuicao_ids {
            match self
                .criar(CriarNotaFiscal {
                    contribuicao_id,
                    observacoes: None,
                })
                .await
            {
                Ok(nota) => criadas.push(nota),
                Err(e) => erros.push(ErroLote {
                    contribuicao_id,
                    erro: e.to_string(),
                }),
            }
        }

        Ok(ResultadoLote {
            total_processadas,
            total_criadas: criadas.len(),
            total_erros: erros.len(),
            notas_fiscais_criadas: criadas,
            erros,
        })
    }

    /// Gera o PDF, grava a referência do arquivo na nota e devolve os dados
    /// formatados.
    pub async fn gerar_pdf(&self, id: Uuid) -> Result<ResultadoPdf, AppError> {
        let (nota, dados, _) = self.renderizar_pdf(id).await?;

        let arquivo = format!("/uploads/notas-fiscais/NF_{}.pdf", nota.nota.numero);
        self.repo.registrar_arquivo(id, &arquivo).await?;

        Ok(ResultadoPdf {
            nota_fiscal: nota.nota,
            dados_formatados: dados,
            arquivo,
        })
    }

    /// Renderiza o documento em memória para download.
    pub async fn baixar_pdf(&self, id: Uuid) -> Result<(String, Vec<u8>), AppError> {
        let (nota, _, bytes) = self.renderizar_pdf(id).await?;
        Ok((format!("NF_{}.pdf", nota.nota.numero), bytes))
    }

    async fn renderizar_pdf(
        &self,
        id: Uuid,
    ) -> Result<(NotaFiscalDetalhada, DadosPdfNota, Vec<u8>), AppError> {
        let nota = self.detalhada(id).await?;

        if nota.nota.status == StatusNotaFiscal::Cancelada {
            return Err(AppError::Invalido(
                "Não é possível gerar PDF de nota fiscal cancelada".to_string(),
            ));
        }

        let organizacao = self
            .configuracoes
            .obter_ou("organizacao.nome", "SERFO")
            .await?;
        let documento = match self.configuracoes.obter("organizacao.documento").await {
            Ok(config) => Some(config.valor),
            Err(AppError::NaoEncontrado(_)) => None,
            Err(e) => return Err(e),
        };

        let dados = formatar_dados_pdf(&nota);
        let bytes = montar_documento(&dados, &organizacao, documento.as_deref())?;

        Ok((nota, dados, bytes))
    }

    pub async fn contribuicoes_sem_nota(&self) -> Result<Vec<ContribuicaoDetalhada>, AppError> {
        self.repo.contribuicoes_sem_nota().await
    }

    pub async fn relatorio_mensal(
        &self,
        periodo: ParamsPeriodo,
    ) -> Result<Vec<crate::models::nota_fiscal::NotasPorMes>, AppError> {
        self.repo.notas_por_mes(&periodo).await
    }

    pub async fn estatisticas(
        &self,
        periodo: ParamsPeriodo,
    ) -> Result<EstatisticasNotasFiscais, AppError> {
        let (total, emitidas, canceladas, valor_total_emitido) =
            self.repo.contagens(&periodo).await?;
        let notas_por_mes = self.repo.notas_por_mes(&periodo).await?;

        Ok(EstatisticasNotasFiscais {
            total,
            emitidas,
            canceladas,
            valor_total_emitido,
            taxa_cancelamento: formatar_percentual(canceladas, total),
            notas_por_mes,
        })
    }

    /// Reenvia a nota por e-mail ao pagador.
    pub async fn reenviar_email(&self, id: Uuid) -> Result<(), AppError> {
        let nota = self.detalhada(id).await?;

        if nota.nota.status == StatusNotaFiscal::Cancelada {
            return Err(AppError::Invalido(
                "Não é possível enviar nota fiscal cancelada".to_string(),
            ));
        }

        let corpo = format!(
            "<h2>Olá, {}!</h2>\
             <p>Segue sua nota fiscal <strong>{}</strong>, no valor de <strong>R$ {:.2}</strong>, \
             emitida em {}.</p>\
             <p>Agradecemos sua contribuição!</p>\
             <p>Atenciosamente,<br>Equipe SERFO</p>",
            nota.pessoa_nome,
            nota.nota.numero,
            nota.nota.valor,
            nota.nota.data_emissao.format("%d/%m/%Y"),
        );

        self.email_service
            .enviar_email(EnviarEmailPayload {
                destinatario: nota.pessoa_email.clone(),
                assunto: Some(format!("SERFO - Nota Fiscal {}", nota.nota.numero)),
                corpo: Some(corpo),
                template_id: None,
                dados: Default::default(),
                agendar_para: None,
            })
            .await?;

        Ok(())
    }

    async fn detalhada(&self, id: Uuid) -> Result<NotaFiscalDetalhada, AppError> {
        self.repo
            .buscar_detalhada_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Nota fiscal não encontrada".to_string()))
    }
}

/// Próximo número da sequência: mantém a sequência se o último número é do
/// ano corrente, senão reinicia em 000001.
pub fn gerar_proximo_numero(ultimo: Option<&str>, ano: i32) -> String {
    let prefixo = format!("NF{}", ano);

    match ultimo {
        Some(numero) if numero.starts_with(&prefixo) => {
            let sequencial: u32 = numero[prefixo.len()..].parse().unwrap_or(0);
            format!("{}{:06}", prefixo, sequencial + 1)
        }
        _ => format!("{}000001", prefixo),
    }
}

fn constraint_violada(e: &sqlx::Error) -> Option<&str> {
    e.as_database_error()
        .filter(|db| db.is_unique_violation())
        .and_then(|db| db.constraint())
}

/// Anexa a anotação de cancelamento com data e hora ao texto existente.
fn observacao_cancelamento(
    observacoes: Option<&str>,
    motivo: Option<&str>,
    agora: DateTime<Utc>,
) -> String {
    let cabecalho = format!("Cancelada em {}", agora.format("%d/%m/%Y %H:%M"));
    let nota = match motivo {
        Some(motivo) => format!("{}: {}", cabecalho, motivo),
        None => cabecalho,
    };
    match observacoes {
        Some(texto) if !texto.is_empty() => format!("{}\n\n{}", texto, nota),
        _ => nota,
    }
}

fn formatar_dados_pdf(nota: &NotaFiscalDetalhada) -> DadosPdfNota {
    DadosPdfNota {
        numero: nota.nota.numero.clone(),
        data_emissao: nota.nota.data_emissao.format("%d/%m/%Y").to_string(),
        valor: nota.nota.valor,
        pagador_nome: nota.pessoa_nome.clone(),
        pagador_email: nota.pessoa_email.clone(),
        pagador_endereco: nota.pessoa_endereco.clone().unwrap_or_default(),
        contribuicao_id: nota.nota.contribuicao_id,
        data_vencimento: nota.data_vencimento.format("%d/%m/%Y").to_string(),
        data_pagamento: nota
            .data_pagamento
            .map(|d| d.format("%d/%m/%Y").to_string()),
        forma_pagamento: nota.forma_pagamento,
        tipo_pessoa: nota.tipo_pessoa.clone(),
        observacoes: nota.nota.observacoes.clone().unwrap_or_default(),
    }
}

/// Monta o documento com genpdf. A fonte vem da pasta `./fonts`, como nos
/// demais documentos do sistema.
fn montar_documento(
    dados: &DadosPdfNota,
    organizacao: &str,
    documento: Option<&str>,
) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None).map_err(|_| {
        AppError::FonteNaoEncontrada("Fonte não encontrada na pasta ./fonts".to_string())
    })?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Nota Fiscal {}", dados.numero));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    doc.push(
        elements::Paragraph::new(organizacao)
            .styled(style::Style::new().bold().with_font_size(18)),
    );
    if let Some(doc_num) = documento {
        doc.push(
            elements::Paragraph::new(format!("CNPJ: {}", doc_num))
                .styled(style::Style::new().with_font_size(10)),
        );
    }

    doc.push(elements::Break::new(1.5));

    doc.push(
        elements::Paragraph::new(format!("NOTA FISCAL {}", dados.numero))
            .styled(style::Style::new().bold().with_font_size(14)),
    );
    doc.push(elements::Paragraph::new(format!(
        "Emissão: {}",
        dados.data_emissao
    )));

    doc.push(elements::Break::new(2));

    let negrito = style::Style::new().bold();
    let mut tabela = elements::TableLayout::new(vec![2, 4]);
    tabela.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let linhas: Vec<(&str, String)> = vec![
        ("Pagador", dados.pagador_nome.clone()),
        ("E-mail", dados.pagador_email.clone()),
        ("Endereço", dados.pagador_endereco.clone()),
        ("Contribuição", dados.contribuicao_id.to_string()),
        ("Vencimento", dados.data_vencimento.clone()),
        (
            "Pagamento",
            dados.data_pagamento.clone().unwrap_or_default(),
        ),
        (
            "Forma de pagamento",
            dados
                .forma_pagamento
                .map(|f| format!("{:?}", f).to_lowercase())
                .unwrap_or_default(),
        ),
        ("Valor", format!("R$ {:.2}", dados.valor)),
    ];

    for (rotulo, valor) in linhas {
        tabela
            .row()
            .element(elements::Paragraph::new(rotulo).styled(negrito))
            .element(elements::Paragraph::new(valor))
            .push()
            .expect("Table row error");
    }

    doc.push(tabela);
    doc.push(elements::Break::new(2));

    if !dados.observacoes.is_empty() {
        doc.push(
            elements::Paragraph::new(format!("Observações: {}", dados.observacoes))
                .styled(style::Style::new().with_font_size(9)),
        );
        doc.push(elements::Break::new(1));
    }

    // QR code com o número da nota, para conferência
    let codigo = QrCode::new(dados.numero.as_bytes())
        .map_err(|e| AppError::Interno(anyhow::Error::msg(e.to_string())))?;
    let imagem = codigo.render::<Luma<u8>>().build();
    let imagem_dinamica = image::DynamicImage::ImageLuma8(imagem);
    let imagem_pdf = genpdf::elements::Image::from_dynamic_image(imagem_dinamica)
        .map_err(|e| AppError::Interno(anyhow::Error::msg(e.to_string())))?
        .with_scale(genpdf::Scale::new(0.5, 0.5));
    doc.push(imagem_pdf);

    let mut buffer = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| AppError::Interno(anyhow::Error::msg(e.to_string())))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn primeira_nota_do_ano_comeca_em_um() {
        assert_eq!(gerar_proximo_numero(None, 2025), "NF2025000001");
    }

    #[test]
    fn sequencia_incrementa_dentro_do_ano() {
        assert_eq!(
            gerar_proximo_numero(Some("NF2025000001"), 2025),
            "NF2025000002"
        );
        assert_eq!(
            gerar_proximo_numero(Some("NF2025000999"), 2025),
            "NF2025001000"
        );
    }

    #[test]
    fn virada_de_ano_reinicia_a_sequencia() {
        assert_eq!(
            gerar_proximo_numero(Some("NF2024000042"), 2025),
            "NF2025000001"
        );
    }

    #[test]
    fn cancelamento_anexa_nota_com_data_e_motivo() {
        let agora = Utc.with_ymd_and_hms(2024, 11, 15, 10, 30, 0).unwrap();

        let texto = observacao_cancelamento(Some("Emitida no balcão"), Some("valor errado"), agora);
        assert_eq!(
            texto,
            "Emitida no balcão\n\nCancelada em 15/11/2024 10:30: valor errado"
        );

        let sem_motivo = observacao_cancelamento(None, None, agora);
        assert_eq!(sem_motivo, "Cancelada em 15/11/2024 10:30");
    }
}
