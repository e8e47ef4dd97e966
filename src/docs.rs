// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gerenciador SERFO",
        description = "API de gestão de voluntários, assistidos, contribuições e finanças da SERFO"
    ),
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::auth::refresh,
        handlers::auth::alterar_senha,

        // --- Sedes ---
        handlers::sedes::listar,
        handlers::sedes::listar_ativas,
        handlers::sedes::estatisticas,
        handlers::sedes::buscar,
        handlers::sedes::criar,
        handlers::sedes::atualizar,
        handlers::sedes::excluir,
        handlers::sedes::alternar_status,

        // --- Voluntários ---
        handlers::voluntarios::listar,
        handlers::voluntarios::estatisticas,
        handlers::voluntarios::buscar,
        handlers::voluntarios::criar,
        handlers::voluntarios::atualizar,
        handlers::voluntarios::atualizar_status,
        handlers::voluntarios::excluir,

        // --- Assistidos ---
        handlers::assistidos::listar,
        handlers::assistidos::estatisticas,
        handlers::assistidos::buscar,
        handlers::assistidos::criar,
        handlers::assistidos::atualizar,
        handlers::assistidos::atualizar_status,
        handlers::assistidos::excluir,

        // --- Contribuições ---
        handlers::contribuicoes::listar,
        handlers::contribuicoes::pendentes,
        handlers::contribuicoes::atrasadas,
        handlers::contribuicoes::do_mes,
        handlers::contribuicoes::estatisticas,
        handlers::contribuicoes::relatorio_inadimplencia,
        handlers::contribuicoes::buscar,
        handlers::contribuicoes::criar,
        handlers::contribuicoes::atualizar,
        handlers::contribuicoes::excluir,
        handlers::contribuicoes::processar_pagamento,
        handlers::contribuicoes::gerar_mensais,
        handlers::contribuicoes::marcar_atrasadas,

        // --- Movimentações ---
        handlers::movimentacoes::listar,
        handlers::movimentacoes::resumo,
        handlers::movimentacoes::relatorio_categoria,
        handlers::movimentacoes::relatorio_conta,
        handlers::movimentacoes::categorias,
        handlers::movimentacoes::contas,
        handlers::movimentacoes::estatisticas,
        handlers::movimentacoes::buscar,
        handlers::movimentacoes::criar,
        handlers::movimentacoes::atualizar,
        handlers::movimentacoes::excluir,

        // --- Notas Fiscais ---
        handlers::notas_fiscais::listar,
        handlers::notas_fiscais::estatisticas,
        handlers::notas_fiscais::contribuicoes_sem_nota,
        handlers::notas_fiscais::relatorio_mensal,
        handlers::notas_fiscais::buscar_por_numero,
        handlers::notas_fiscais::buscar,
        handlers::notas_fiscais::criar,
        handlers::notas_fiscais::atualizar,
        handlers::notas_fiscais::gerar_lote,
        handlers::notas_fiscais::cancelar,
        handlers::notas_fiscais::gerar_pdf,
        handlers::notas_fiscais::baixar_pdf,
        handlers::notas_fiscais::reenviar_email,

        // --- Emails ---
        handlers::emails::enviar,
        handlers::emails::enviar_lote,
        handlers::emails::processar_agendados,
        handlers::emails::reenviar,
        handlers::emails::testar_conexao,
        handlers::emails::logs,
        handlers::emails::listar_templates,
        handlers::emails::templates_por_tipo,
        handlers::emails::buscar_template,
        handlers::emails::criar_template,
        handlers::emails::atualizar_template,
        handlers::emails::excluir_template,
        handlers::emails::ativar_template,
        handlers::emails::duplicar_template,
        handlers::emails::renderizar_template,

        // --- Relatórios ---
        handlers::relatorios::dashboard,
        handlers::relatorios::resumo_financeiro,
        handlers::relatorios::metricas_chave,
        handlers::relatorios::receitas,
        handlers::relatorios::despesas,
        handlers::relatorios::contribuicoes,
        handlers::relatorios::projecao_financeira,
        handlers::relatorios::comparativo_mensal,
        handlers::relatorios::completo,

        // --- Super Admin ---
        handlers::super_admin::dashboard,
        handlers::super_admin::listar_usuarios,
        handlers::super_admin::criar_usuario,
        handlers::super_admin::atualizar_usuario,
        handlers::super_admin::excluir_usuario,
        handlers::super_admin::transferir_usuario,
        handlers::super_admin::listar_assistidos,
        handlers::super_admin::criar_assistido,
        handlers::super_admin::atualizar_assistido,
        handlers::super_admin::excluir_assistido,
        handlers::super_admin::listar_sedes,
        handlers::super_admin::criar_sede,
        handlers::super_admin::atualizar_sede,
        handlers::super_admin::excluir_sede,
    ),
    components(schemas(
        models::sede::Sede,
        models::sede::SedeComContadores,
        models::sede::SedeResumida,
        models::sede::CriarSede,
        models::sede::AtualizarSede,
        models::sede::EstatisticasSedes,
        models::voluntario::Cargo,
        models::voluntario::StatusPessoa,
        models::voluntario::Voluntario,
        models::voluntario::VoluntarioComSede,
        models::voluntario::CriarVoluntario,
        models::voluntario::AtualizarVoluntario,
        models::voluntario::AtualizarStatusPessoa,
        models::voluntario::EstatisticasVoluntarios,
        models::assistido::Assistido,
        models::assistido::AssistidoComSede,
        models::assistido::CriarAssistido,
        models::assistido::AtualizarAssistido,
        models::assistido::EstatisticasAssistidos,
        models::contribuicao::StatusContribuicao,
        models::contribuicao::FormaPagamento,
        models::contribuicao::Contribuicao,
        models::contribuicao::ContribuicaoDetalhada,
        models::contribuicao::CriarContribuicao,
        models::contribuicao::AtualizarContribuicao,
        models::contribuicao::DadosPagamento,
        models::contribuicao::GerarMensaisPayload,
        models::contribuicao::EstatisticasContribuicoes,
        models::contribuicao::ResultadoGeracaoMensal,
        models::contribuicao::ContribuicaoAtrasadaResumo,
        models::contribuicao::InadimplenciaPessoa,
        models::movimentacao::TipoMovimentacao,
        models::movimentacao::Movimentacao,
        models::movimentacao::CriarMovimentacao,
        models::movimentacao::AtualizarMovimentacao,
        models::movimentacao::LadoResumo,
        models::movimentacao::ResumoFinanceiro,
        models::movimentacao::ResumoCategoria,
        models::movimentacao::ResumoConta,
        models::movimentacao::EstatisticasMovimentacoes,
        models::nota_fiscal::StatusNotaFiscal,
        models::nota_fiscal::NotaFiscal,
        models::nota_fiscal::NotaFiscalDetalhada,
        models::nota_fiscal::CriarNotaFiscal,
        models::nota_fiscal::AtualizarNotaFiscal,
        models::nota_fiscal::CancelarNotaFiscal,
        models::nota_fiscal::GerarLotePayload,
        models::nota_fiscal::ErroLote,
        models::nota_fiscal::ResultadoLote,
        models::nota_fiscal::NotasPorMes,
        models::nota_fiscal::DadosPdfNota,
        models::nota_fiscal::ResultadoPdf,
        models::nota_fiscal::EstatisticasNotasFiscais,
        models::email::TipoTemplateEmail,
        models::email::StatusEnvioEmail,
        models::email::TemplateEmail,
        models::email::LogEmail,
        models::email::CriarTemplateEmail,
        models::email::AtualizarTemplateEmail,
        models::email::AtivarTemplatePayload,
        models::email::DuplicarTemplatePayload,
        models::email::RenderizarTemplatePayload,
        models::email::TemplateRenderizado,
        models::email::EnviarEmailPayload,
        models::email::DestinatarioLote,
        models::email::EnviarEmailLotePayload,
        models::email::ErroEnvioLote,
        models::email::ResultadoEnvioLote,
        models::relatorio::DashboardGeral,
        models::relatorio::ResumoFinanceiroDashboard,
        models::relatorio::PessoasAtivas,
        models::relatorio::QuebraPorChave,
        models::relatorio::PeriodoResumo,
        models::relatorio::CategoriaTotal,
        models::relatorio::ResumoMovimentos,
        models::relatorio::RelatorioMovimentos,
        models::relatorio::StatusTotal,
        models::relatorio::TipoPessoaTotal,
        models::relatorio::ResumoRelatorioContribuicoes,
        models::relatorio::RelatorioContribuicoes,
        models::relatorio::BaseProjecao,
        models::relatorio::ProjecaoMes,
        models::relatorio::ProjecaoFinanceira,
        models::relatorio::LadoComparativo,
        models::relatorio::ComparativoMes,
        models::relatorio::TotaisAnuais,
        models::relatorio::ComparativoMensal,
        models::relatorio::MetricasChave,
        models::relatorio::PeriodoRelatorio,
        models::relatorio::RelatorioCompleto,
        models::relatorio::TotaisPorStatus,
        models::relatorio::SedeStats,
        models::relatorio::DashboardSuperAdmin,
        handlers::super_admin::TransferirUsuarioPayload,
        models::auth::LoginPayload,
        models::auth::AlterarSenhaPayload,
        models::auth::UsuarioLogado,
        models::auth::RespostaLogin,
        models::auth::RespostaToken,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
