//! Renderizador printpdf: desenho direto em A4 paisagem.
//!
//! É o renderizador padrão por não depender de binário externo. A
//! geometria reproduz o layout dos relatórios: capa preenchida, faixa
//! de cabeçalho nas páginas de conteúdo, grade de fotos com caixa de
//! proporção fixa e contracapa com a arte institucional.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Rect, Rgb,
};
use std::sync::Arc;

use super::branding::{Branding, BrandingImagens};
use super::documento::{Capa, Documento, GradeFotos, LinhaServico, Pagina};
use super::images::{FotoCarregada, ImagemFoto};
use super::renderer::PdfRenderer;
use super::RenderError;
use crate::relatorio::models::QuantitativoItem;

const LARGURA: f32 = 297.0;
const ALTURA: f32 = 210.0;
const MARGEM: f32 = 15.0;
const ESPACO_GRADE: f32 = 10.0;
const PT_PARA_MM: f32 = 0.352_778;
const DPI: f32 = 300.0;

const TEXTO_INDISPONIVEL: &str = "Imagem não disponível";

fn azul_capa() -> Color {
    Color::Rgb(Rgb::new(102.0 / 255.0, 126.0 / 255.0, 234.0 / 255.0, None))
}

fn cinza_cabecalho() -> Color {
    Color::Rgb(Rgb::new(52.0 / 255.0, 73.0 / 255.0, 94.0 / 255.0, None))
}

fn branco() -> Color {
    Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None))
}

fn preto() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

struct Fontes {
    regular: IndirectFontRef,
    negrito: IndirectFontRef,
}

impl Fontes {
    fn carregar(doc: &PdfDocumentReference) -> Result<Self, RenderError> {
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let negrito = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(Self { regular, negrito })
    }
}

pub struct PrintpdfRenderer {
    branding: Arc<Branding>,
}

impl PrintpdfRenderer {
    pub fn new(branding: Arc<Branding>) -> Self {
        Self { branding }
    }
}

impl PdfRenderer for PrintpdfRenderer {
    fn nome(&self) -> &'static str {
        "printpdf"
    }

    fn render(&self, documento: &Documento) -> Result<Vec<u8>, RenderError> {
        let (doc, primeira_pagina, primeira_camada) =
            PdfDocument::new(documento.titulo.as_str(), Mm(LARGURA), Mm(ALTURA), "Camada 1");
        let fontes = Fontes::carregar(&doc)?;
        let arte = self.branding.imagens();

        for (indice, pagina) in documento.paginas.iter().enumerate() {
            let camada = if indice == 0 {
                doc.get_page(primeira_pagina).get_layer(primeira_camada)
            } else {
                let (pagina_ref, camada_ref) =
                    doc.add_page(Mm(LARGURA), Mm(ALTURA), format!("Página {}", indice + 1));
                doc.get_page(pagina_ref).get_layer(camada_ref)
            };

            match pagina {
                Pagina::Capa(capa) => desenhar_capa(&camada, &fontes, capa, &arte),
                Pagina::Quantitativo { itens } => desenhar_quantitativo(&camada, &fontes, itens),
                Pagina::GradeFotos(grade) => desenhar_grade(&camada, &fontes, grade, &arte),
                Pagina::ListaServicos { servicos, inicio } => {
                    desenhar_lista_servicos(&camada, &fontes, servicos, *inicio)
                }
                Pagina::Contracapa => desenhar_contracapa(&camada, &fontes, &arte),
            }
        }

        doc.save_to_bytes().map_err(|e| RenderError::Pdf(e.to_string()))
    }
}

// ----------------------------------------------------------------------------
// Páginas
// ----------------------------------------------------------------------------

fn desenhar_capa(
    camada: &PdfLayerReference,
    fontes: &Fontes,
    capa: &Capa,
    arte: &BrandingImagens,
) {
    if let Some(fundo) = &arte.capa {
        desenhar_imagem_esticada(camada, fundo, 0.0, 0.0, LARGURA, ALTURA);
    } else {
        preencher_retangulo(camada, 0.0, 0.0, LARGURA, ALTURA, azul_capa());
    }

    if let Some(logo) = &arte.logo {
        desenhar_imagem_contida(camada, logo, LARGURA - 50.0, ALTURA - 45.0, 35.0, 35.0);
    }

    camada.set_fill_color(branco());
    texto_centralizado(camada, &fontes.negrito, &capa.titulo, 28.0, 135.0);
    texto_centralizado(camada, &fontes.regular, &capa.subtitulo, 18.0, 115.0);

    let mut y = 95.0;
    for linha in &capa.info {
        texto_centralizado(camada, &fontes.regular, linha, 13.0, y);
        y -= 9.0;
    }

    if !capa.data_extenso.is_empty() {
        texto_centralizado(camada, &fontes.regular, &capa.data_extenso, 11.0, 20.0);
    }

    camada.set_fill_color(preto());
}

fn desenhar_quantitativo(
    camada: &PdfLayerReference,
    fontes: &Fontes,
    itens: &[QuantitativoItem],
) {
    faixa_cabecalho(camada, fontes, "QUANTITATIVO");

    let x_item = MARGEM + 5.0;
    let x_quantidade = 170.0;
    let x_unidade = 230.0;
    let mut y = ALTURA - 45.0;

    camada.use_text("Item", 12.0, Mm(x_item), Mm(y), &fontes.negrito);
    camada.use_text("Quantidade", 12.0, Mm(x_quantidade), Mm(y), &fontes.negrito);
    camada.use_text("Unidade", 12.0, Mm(x_unidade), Mm(y), &fontes.negrito);
    y -= 3.0;
    linha_horizontal(camada, MARGEM, LARGURA - MARGEM, y);
    y -= 7.0;

    for item in itens {
        if y < 20.0 {
            camada.use_text("…", 11.0, Mm(x_item), Mm(y), &fontes.regular);
            break;
        }

        camada.use_text(item.descricao.as_str(), 11.0, Mm(x_item), Mm(y), &fontes.regular);
        camada.use_text(
            formatar_quantidade(item.quantidade),
            11.0,
            Mm(x_quantidade),
            Mm(y),
            &fontes.regular,
        );
        camada.use_text(
            item.unidade.as_deref().unwrap_or("un"),
            11.0,
            Mm(x_unidade),
            Mm(y),
            &fontes.regular,
        );
        y -= 8.0;
    }
}

fn desenhar_grade(
    camada: &PdfLayerReference,
    fontes: &Fontes,
    grade: &GradeFotos,
    arte: &BrandingImagens,
) {
    faixa_cabecalho(camada, fontes, &grade.titulo);

    if let Some(logo) = &arte.logo {
        desenhar_imagem_contida(camada, logo, LARGURA - 40.0, ALTURA - 32.0, 25.0, 14.0);
    }

    let mut y = ALTURA - 42.0;

    if let Some(cabecalho) = &grade.cabecalho {
        for (rotulo, valor) in &cabecalho.campos {
            let rotulo = format!("{}: ", rotulo);
            camada.use_text(rotulo.as_str(), 10.5, Mm(MARGEM), Mm(y), &fontes.negrito);
            let deslocamento = largura_estimada(&rotulo, 10.5);
            camada.use_text(valor.as_str(), 10.5, Mm(MARGEM + deslocamento), Mm(y), &fontes.regular);
            y -= 6.0;
        }
        y -= 4.0;
    }

    if grade.fotos.is_empty() {
        return;
    }

    let colunas = grade.colunas.max(1);
    let largura_celula =
        (LARGURA - 2.0 * MARGEM - (colunas as f32 - 1.0) * ESPACO_GRADE) / colunas as f32;
    let altura_caixa = (largura_celula * 0.75).min(y - MARGEM - 12.0);
    let y_caixa = y - altura_caixa;

    for (coluna, foto) in grade.fotos.iter().enumerate() {
        let x = MARGEM + coluna as f32 * (largura_celula + ESPACO_GRADE);
        desenhar_foto(camada, fontes, foto, x, y_caixa, largura_celula, altura_caixa);
    }
}

fn desenhar_foto(
    camada: &PdfLayerReference,
    fontes: &Fontes,
    foto: &FotoCarregada,
    x: f32,
    y: f32,
    largura: f32,
    altura: f32,
) {
    match &foto.imagem {
        Some(imagem) => desenhar_imagem_contida(camada, imagem, x, y, largura, altura),
        None => {
            contornar_retangulo(camada, x, y, largura, altura);
            let x_texto = x + (largura - largura_estimada(TEXTO_INDISPONIVEL, 10.0)) / 2.0;
            camada.use_text(
                TEXTO_INDISPONIVEL,
                10.0,
                Mm(x_texto),
                Mm(y + altura / 2.0),
                &fontes.regular,
            );
        }
    }

    if let Some(descricao) = &foto.descricao {
        let x_texto = x + (largura - largura_estimada(descricao, 9.0)).max(0.0) / 2.0;
        camada.use_text(descricao.as_str(), 9.0, Mm(x_texto), Mm(y - 5.0), &fontes.regular);
    }
}

fn desenhar_lista_servicos(
    camada: &PdfLayerReference,
    fontes: &Fontes,
    servicos: &[LinhaServico],
    inicio: usize,
) {
    faixa_cabecalho(camada, fontes, "LISTA DE SERVIÇOS");

    let mut y = ALTURA - 45.0;
    for (indice, servico) in servicos.iter().enumerate() {
        camada.use_text(
            format!("{}. {}", inicio + indice + 1, servico.assunto),
            13.0,
            Mm(MARGEM),
            Mm(y),
            &fontes.negrito,
        );
        camada.use_text(
            format!("Fotos: {}", servico.quantidade_fotos),
            10.0,
            Mm(MARGEM + 8.0),
            Mm(y - 6.0),
            &fontes.regular,
        );
        y -= 16.0;
    }
}

fn desenhar_contracapa(
    camada: &PdfLayerReference,
    fontes: &Fontes,
    arte: &BrandingImagens,
) {
    match &arte.linha {
        Some(linha) => {
            desenhar_imagem_esticada(camada, linha, 0.0, ALTURA - 12.0, LARGURA, 8.0);
            desenhar_imagem_esticada(camada, linha, 0.0, 4.0, LARGURA, 8.0);
        }
        None => {
            linha_horizontal(camada, MARGEM, LARGURA - MARGEM, ALTURA - 12.0);
            linha_horizontal(camada, MARGEM, LARGURA - MARGEM, 12.0);
        }
    }

    match &arte.logo {
        Some(logo) => {
            desenhar_imagem_contida(camada, logo, (LARGURA - 110.0) / 2.0, 55.0, 110.0, 110.0)
        }
        None => texto_centralizado(
            camada,
            &fontes.negrito,
            "PREFEITURA DE SÃO PAULO",
            20.0,
            ALTURA / 2.0,
        ),
    }
}

// ----------------------------------------------------------------------------
// Primitivas
// ----------------------------------------------------------------------------

fn faixa_cabecalho(camada: &PdfLayerReference, fontes: &Fontes, titulo: &str) {
    preencher_retangulo(
        camada,
        MARGEM,
        ALTURA - 30.0,
        LARGURA - 2.0 * MARGEM,
        12.0,
        cinza_cabecalho(),
    );
    camada.set_fill_color(branco());
    camada.use_text(titulo, 16.0, Mm(MARGEM + 5.0), Mm(ALTURA - 26.5), &fontes.negrito);
    camada.set_fill_color(preto());
}

fn preencher_retangulo(
    camada: &PdfLayerReference,
    x: f32,
    y: f32,
    largura: f32,
    altura: f32,
    cor: Color,
) {
    camada.set_fill_color(cor);
    camada.add_rect(
        Rect::new(Mm(x), Mm(y), Mm(x + largura), Mm(y + altura)).with_mode(PaintMode::Fill),
    );
    camada.set_fill_color(preto());
}

fn contornar_retangulo(camada: &PdfLayerReference, x: f32, y: f32, largura: f32, altura: f32) {
    camada.set_outline_color(cinza_cabecalho());
    camada.set_outline_thickness(0.7);
    camada.add_rect(
        Rect::new(Mm(x), Mm(y), Mm(x + largura), Mm(y + altura)).with_mode(PaintMode::Stroke),
    );
}

fn linha_horizontal(camada: &PdfLayerReference, x1: f32, x2: f32, y: f32) {
    camada.set_outline_color(preto());
    camada.set_outline_thickness(0.5);
    camada.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Desenha a imagem contida na caixa, centralizada, preservando a
/// proporção.
fn desenhar_imagem_contida(
    camada: &PdfLayerReference,
    imagem: &ImagemFoto,
    x: f32,
    y: f32,
    largura_max: f32,
    altura_max: f32,
) {
    let natural_largura = imagem.largura as f32 * 25.4 / DPI;
    let natural_altura = imagem.altura as f32 * 25.4 / DPI;
    if natural_largura <= 0.0 || natural_altura <= 0.0 {
        return;
    }

    let escala = (largura_max / natural_largura).min(altura_max / natural_altura);
    let largura = natural_largura * escala;
    let altura = natural_altura * escala;

    Image::from_dynamic_image(&imagem.imagem).add_to_layer(
        camada.clone(),
        ImageTransform {
            translate_x: Some(Mm(x + (largura_max - largura) / 2.0)),
            translate_y: Some(Mm(y + (altura_max - altura) / 2.0)),
            scale_x: Some(escala),
            scale_y: Some(escala),
            dpi: Some(DPI),
            ..Default::default()
        },
    );
}

/// Desenha a imagem esticada para preencher exatamente a caixa.
fn desenhar_imagem_esticada(
    camada: &PdfLayerReference,
    imagem: &ImagemFoto,
    x: f32,
    y: f32,
    largura: f32,
    altura: f32,
) {
    let natural_largura = imagem.largura as f32 * 25.4 / DPI;
    let natural_altura = imagem.altura as f32 * 25.4 / DPI;
    if natural_largura <= 0.0 || natural_altura <= 0.0 {
        return;
    }

    Image::from_dynamic_image(&imagem.imagem).add_to_layer(
        camada.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            scale_x: Some(largura / natural_largura),
            scale_y: Some(altura / natural_altura),
            dpi: Some(DPI),
            ..Default::default()
        },
    );
}

fn texto_centralizado(
    camada: &PdfLayerReference,
    fonte: &IndirectFontRef,
    texto: &str,
    tamanho: f32,
    y: f32,
) {
    let x = ((LARGURA - largura_estimada(texto, tamanho)) / 2.0).max(MARGEM);
    camada.use_text(texto, tamanho, Mm(x), Mm(y), fonte);
}

/// Largura aproximada de um texto em Helvetica (média de 0,5 em por
/// caractere); suficiente para centralizar títulos.
fn largura_estimada(texto: &str, tamanho_pt: f32) -> f32 {
    texto.chars().count() as f32 * tamanho_pt * 0.5 * PT_PARA_MM
}

fn formatar_quantidade(quantidade: Option<f64>) -> String {
    match quantidade {
        Some(valor) if valor.fract() == 0.0 => format!("{:.0}", valor),
        Some(valor) => format!("{}", valor),
        None => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::branding::Branding;
    use crate::pdf::documento::{Capa, Documento, Pagina};
    use std::path::PathBuf;

    #[test]
    fn test_render_documento_minimo() {
        let branding = Arc::new(Branding::new(PathBuf::from("/inexistente")));
        let renderer = PrintpdfRenderer::new(branding);
        let documento = Documento {
            titulo: "Teste".to_string(),
            paginas: vec![
                Pagina::Capa(Capa {
                    titulo: "RELATÓRIO DE EVIDÊNCIAS".to_string(),
                    subtitulo: "Zeladoria Urbana".to_string(),
                    info: vec!["Data: 15/01/2024".to_string()],
                    data_extenso: "São Paulo, Janeiro de 2024".to_string(),
                }),
                Pagina::Contracapa,
            ],
        };

        let pdf = renderer.render(&documento).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_formatar_quantidade() {
        assert_eq!(formatar_quantidade(Some(12.0)), "12");
        assert_eq!(formatar_quantidade(Some(12.5)), "12.5");
        assert_eq!(formatar_quantidade(None), "0");
    }
}
