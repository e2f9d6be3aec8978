use actix_web::{web, HttpResponse, Responder};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::pdf::images::{carregar_fotos, carregar_secoes, FotoFonte};
use crate::pdf::{layout, Documento, GeneratedDocument, PdfRenderer};
use crate::ErrorResponse;

use super::filename::{nome_arquivo, nome_arquivo_consolidado};
use super::models::{
    EvidenciasRelatorio, GeneratePdfRequest, MonumentosRelatorio, MutiraoRelatorio,
    RotineirosRelatorio, TipoRelatorio,
};
use super::validation;

/// Estado compartilhado: renderizador ativo e fonte de fotos.
pub struct AppState {
    pub renderer: Arc<dyn PdfRenderer>,
    pub fotos: Arc<dyn FotoFonte>,
}

lazy_static::lazy_static! {
    static ref PDFS_GERADOS: prometheus::IntCounterVec = {
        let contador = prometheus::IntCounterVec::new(
            prometheus::Opts::new(
                "zeladoria_pdfs_gerados_total",
                "PDFs gerados com sucesso, por tipo de relatório",
            ),
            &["tipo"],
        )
        .expect("definição de métrica inválida");
        let _ = prometheus::default_registry().register(Box::new(contador.clone()));
        contador
    };
}

#[utoipa::path(
    context_path = "/api",
    tag = "Relatórios",
    post,
    path = "/generate-pdf",
    request_body = GeneratePdfRequest,
    responses(
        (status = 200, description = "PDF gerado", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Tipo desconhecido ou dados incompletos", body = ErrorResponse),
        (status = 500, description = "Falha na renderização", body = ErrorResponse)
    )
)]
pub async fn generate_pdf(
    state: web::Data<AppState>,
    body: web::Json<GeneratePdfRequest>,
) -> impl Responder {
    let req = body.into_inner();
    log::info!(
        "Requisição de PDF: tipo={}, consolidated={}",
        req.tipo.slug(),
        req.consolidated
    );

    let (documento, nome) = match preparar(&state, &req).await {
        Ok(preparado) => preparado,
        Err(resposta) => return resposta,
    };

    let paginas = documento.numero_paginas();
    let renderer = Arc::clone(&state.renderer);
    let resultado = web::block(move || renderer.render(&documento)).await;

    match resultado {
        Ok(Ok(pdf)) => {
            let gerado = GeneratedDocument {
                filename: nome,
                pdf,
                paginas,
            };
            log::info!(
                "PDF gerado: {}.pdf ({} páginas, {} bytes)",
                gerado.filename,
                gerado.paginas,
                gerado.pdf.len()
            );
            PDFS_GERADOS.with_label_values(&[req.tipo.slug()]).inc();
            resposta_pdf(gerado)
        }
        Ok(Err(erro)) => {
            log::error!("Erro ao gerar PDF: {}", erro);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&format!(
                "Erro interno do servidor ao gerar PDF: {}",
                erro
            )))
        }
        Err(erro) => {
            log::error!("Tarefa de renderização interrompida: {}", erro);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(
                "Erro interno do servidor ao gerar PDF",
            ))
        }
    }
}

/// Roteia por tipo: desserializa `dados`, valida, resolve as fotos e
/// monta o documento e o nome de arquivo.
async fn preparar(
    state: &AppState,
    req: &GeneratePdfRequest,
) -> Result<(Documento, String), HttpResponse> {
    match req.tipo {
        TipoRelatorio::Mutirao => {
            let rel: MutiraoRelatorio = desserializar(&req.dados, "mutirão")?;
            validar(validation::validar_mutirao(&rel))?;

            let fotos = carregar_secoes(state.fotos.as_ref(), &rel.secoes).await;
            let nome = if req.consolidated {
                nome_arquivo_consolidado(rel.data)
            } else {
                nome_arquivo(req.tipo, rel.title.as_deref(), rel.data)
            };
            Ok((layout::montar_mutirao(&rel, fotos), nome))
        }

        TipoRelatorio::Evidencias | TipoRelatorio::Registro | TipoRelatorio::Unified => {
            let rel: EvidenciasRelatorio = desserializar(&req.dados, req.tipo.slug())?;
            validar(validation::validar_evidencias(&rel))?;

            let fotos = carregar_fotos(state.fotos.as_ref(), &rel.fotos).await;
            let nome = nome_arquivo(req.tipo, Some(&rel.tipo_servico), rel.data_referencia());
            Ok((layout::montar_evidencias(&rel, fotos), nome))
        }

        TipoRelatorio::Rotineiros => {
            let rel: RotineirosRelatorio = desserializar(&req.dados, "rotineiros")?;
            validar(validation::validar_rotineiros(&rel))?;

            let nome = nome_arquivo(req.tipo, rel.tipo_servico.as_deref(), rel.data);
            Ok((layout::montar_rotineiros(&rel), nome))
        }

        TipoRelatorio::Monumentos => {
            let rel: MonumentosRelatorio = desserializar(&req.dados, "monumentos")?;
            validar(validation::validar_monumentos(&rel))?;

            let fotos = carregar_fotos(state.fotos.as_ref(), &rel.fotos).await;
            let nome = nome_arquivo(req.tipo, Some(&rel.tipo_servico), rel.data);
            Ok((layout::montar_monumentos(&rel, fotos), nome))
        }
    }
}

fn desserializar<T: DeserializeOwned>(
    dados: &serde_json::Value,
    rotulo: &str,
) -> Result<T, HttpResponse> {
    serde_json::from_value(dados.clone()).map_err(|erro| {
        HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!(
            "Dados do {} incompletos: {}",
            rotulo, erro
        )))
    })
}

fn validar(resultado: Result<(), String>) -> Result<(), HttpResponse> {
    resultado
        .map_err(|mensagem| HttpResponse::BadRequest().json(ErrorResponse::bad_request(&mensagem)))
}

fn resposta_pdf(gerado: GeneratedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            format!(
                "attachment; filename*=UTF-8''{}.pdf",
                urlencoding::encode(&gerado.filename)
            ),
        ))
        .body(gerado.pdf)
}

/// PDF mínimo escrito à mão, devolvido sem passar por renderizador.
const PDF_TESTE: &str = "%PDF-1.4\n\
1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n\
2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n\
3 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R >>\nendobj\n\
4 0 obj\n<< /Length 52 >>\nstream\nBT\n/F1 12 Tf\n72 720 Td\n(Teste de conectividade) Tj\nET\nendstream\nendobj\n\
trailer\n<< /Size 5 /Root 1 0 R >>\n%%EOF\n";

#[utoipa::path(
    context_path = "/api",
    tag = "Relatórios",
    get,
    path = "/test-pdf",
    responses(
        (status = 200, description = "PDF estático de teste", body = Vec<u8>, content_type = "application/pdf")
    )
)]
pub async fn test_pdf() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"teste-conectividade.pdf\"",
        ))
        .body(PDF_TESTE)
}
