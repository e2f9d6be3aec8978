//! Renderizador Typst.
//!
//! Gera o código-fonte Typst do documento, grava as fotos e as artes
//! institucionais no diretório temporário de compilação e invoca o CLI
//! `typst`. Requer o binário `typst` no PATH.

use std::fmt::Write as _;
use std::fs;
use std::process::Command;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

use super::branding::Branding;
use super::documento::{Capa, Documento, GradeFotos, LinhaServico, Pagina};
use super::renderer::PdfRenderer;
use super::RenderError;
use crate::relatorio::models::QuantitativoItem;

const ARQUIVO_FONTE: &str = "relatorio.typ";
const ARQUIVO_SAIDA: &str = "relatorio.pdf";

pub struct TypstRenderer {
    branding: Arc<Branding>,
}

impl TypstRenderer {
    pub fn new(branding: Arc<Branding>) -> Self {
        Self { branding }
    }
}

impl PdfRenderer for TypstRenderer {
    fn nome(&self) -> &'static str {
        "typst"
    }

    fn render(&self, documento: &Documento) -> Result<Vec<u8>, RenderError> {
        let temp_dir = tempdir().map_err(RenderError::TempDir)?;

        // Artes institucionais presentes no disco entram no contexto de
        // compilação com o mesmo nome de arquivo.
        let mut artes = ArtesDisponiveis::default();
        for (nome, caminho) in self.branding.arquivos() {
            match fs::copy(&caminho, temp_dir.path().join(nome)) {
                Ok(_) => artes.registrar(nome),
                Err(e) => log::warn!("arte institucional não copiada ({}): {}", nome, e),
            }
        }

        let fonte = montar_fonte(documento, &temp_dir, &artes)?;
        fs::write(temp_dir.path().join(ARQUIVO_FONTE), fonte)
            .map_err(RenderError::WriteTypst)?;

        compilar(&temp_dir)
    }
}

#[derive(Default)]
struct ArtesDisponiveis {
    logo: bool,
    capa: bool,
    linha: bool,
}

impl ArtesDisponiveis {
    fn registrar(&mut self, nome: &str) {
        match nome {
            "logo.png" => self.logo = true,
            "capa.png" => self.capa = true,
            "linha.png" => self.linha = true,
            _ => {}
        }
    }
}

/// Compila o diretório temporário com o CLI `typst` e lê o PDF gerado.
fn compilar(temp_dir: &TempDir) -> Result<Vec<u8>, RenderError> {
    let status = Command::new("typst")
        .arg("compile")
        .arg(ARQUIVO_FONTE)
        .arg(ARQUIVO_SAIDA)
        .current_dir(temp_dir.path())
        .status()
        .map_err(RenderError::TypstIo)?;

    if !status.success() {
        let codigo = status.code().unwrap_or(-1);
        return Err(RenderError::TypstExit(codigo));
    }

    fs::read(temp_dir.path().join(ARQUIVO_SAIDA)).map_err(RenderError::ReadPdf)
}

/// Escapa caracteres especiais para literais de string Typst.
fn escapar_typst(valor: &str) -> String {
    valor
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

fn montar_fonte(
    documento: &Documento,
    temp_dir: &TempDir,
    artes: &ArtesDisponiveis,
) -> Result<String, RenderError> {
    let mut fonte = String::new();
    let mut contador_fotos = 0usize;

    fonte.push_str("#set page(paper: \"a4\", flipped: true, margin: 1.5cm)\n");
    fonte.push_str("#set text(size: 11pt)\n\n");

    for (indice, pagina) in documento.paginas.iter().enumerate() {
        if indice > 0 {
            fonte.push_str("#pagebreak()\n");
        }

        match pagina {
            Pagina::Capa(capa) => emitir_capa(&mut fonte, capa, artes),
            Pagina::Quantitativo { itens } => emitir_quantitativo(&mut fonte, itens),
            Pagina::GradeFotos(grade) => {
                emitir_grade(&mut fonte, grade, temp_dir, &mut contador_fotos, artes)?
            }
            Pagina::ListaServicos { servicos, inicio } => {
                emitir_lista_servicos(&mut fonte, servicos, *inicio)
            }
            Pagina::Contracapa => emitir_contracapa(&mut fonte, artes),
        }
    }

    Ok(fonte)
}

fn emitir_capa(fonte: &mut String, capa: &Capa, artes: &ArtesDisponiveis) {
    // Fundo de página inteira via place, compensando a margem; trocar as
    // opções de página no meio do documento criaria uma página extra.
    if artes.capa {
        fonte.push_str(
            "#place(top + left, dx: -1.5cm, dy: -1.5cm, image(\"capa.png\", width: 29.7cm, height: 21cm))\n",
        );
    } else {
        fonte.push_str(
            "#place(top + left, dx: -1.5cm, dy: -1.5cm, rect(width: 29.7cm, height: 21cm, fill: rgb(\"667eea\")))\n",
        );
    }

    if artes.logo {
        fonte.push_str("#place(top + right, image(\"logo.png\", width: 3.5cm))\n");
    }

    fonte.push_str("#align(center + horizon)[\n");
    let _ = writeln!(
        fonte,
        "  #text(size: 28pt, weight: \"bold\", fill: white)[#\"{}\"]",
        escapar_typst(&capa.titulo)
    );
    let _ = writeln!(
        fonte,
        "  #linebreak() #text(size: 18pt, fill: white)[#\"{}\"]",
        escapar_typst(&capa.subtitulo)
    );
    for linha in &capa.info {
        let _ = writeln!(
            fonte,
            "  #linebreak() #text(size: 13pt, fill: white)[#\"{}\"]",
            escapar_typst(linha)
        );
    }
    fonte.push_str("]\n");

    if !capa.data_extenso.is_empty() {
        let _ = writeln!(
            fonte,
            "#place(bottom + center, dy: -0.5cm, text(size: 11pt, fill: white)[#\"{}\"])",
            escapar_typst(&capa.data_extenso)
        );
    }
}

fn emitir_faixa(fonte: &mut String, titulo: &str) {
    let _ = writeln!(
        fonte,
        "#block(width: 100%, fill: rgb(\"34495e\"), inset: 8pt)[#text(size: 14pt, weight: \"bold\", fill: white)[#\"{}\"]]",
        escapar_typst(titulo)
    );
}

fn emitir_quantitativo(fonte: &mut String, itens: &[QuantitativoItem]) {
    emitir_faixa(fonte, "QUANTITATIVO");
    fonte.push_str("#v(0.5cm)\n");
    fonte.push_str("#table(\n  columns: (1fr, auto, auto),\n  inset: 8pt,\n  stroke: 0.5pt,\n");
    fonte.push_str("  [#text(weight: \"bold\")[Item]], [#text(weight: \"bold\")[Quantidade]], [#text(weight: \"bold\")[Unidade]],\n");

    for item in itens {
        let quantidade = match item.quantidade {
            Some(valor) if valor.fract() == 0.0 => format!("{:.0}", valor),
            Some(valor) => format!("{}", valor),
            None => "0".to_string(),
        };
        let _ = writeln!(
            fonte,
            "  [#\"{}\"], [#\"{}\"], [#\"{}\"],",
            escapar_typst(&item.descricao),
            quantidade,
            escapar_typst(item.unidade.as_deref().unwrap_or("un"))
        );
    }

    fonte.push_str(")\n");
}

fn emitir_grade(
    fonte: &mut String,
    grade: &GradeFotos,
    temp_dir: &TempDir,
    contador_fotos: &mut usize,
    artes: &ArtesDisponiveis,
) -> Result<(), RenderError> {
    emitir_faixa(fonte, &grade.titulo);

    if artes.logo {
        fonte.push_str("#place(top + right, dy: -0.8cm, image(\"logo.png\", width: 2.2cm))\n");
    }

    if let Some(cabecalho) = &grade.cabecalho {
        fonte.push_str("#v(0.3cm)\n");
        for (rotulo, valor) in &cabecalho.campos {
            let _ = writeln!(
                fonte,
                "#text(size: 10.5pt, weight: \"bold\")[#\"{}: \"]#text(size: 10.5pt)[#\"{}\"] #linebreak()",
                escapar_typst(rotulo),
                escapar_typst(valor)
            );
        }
    }

    if grade.fotos.is_empty() {
        return Ok(());
    }

    fonte.push_str("#v(0.4cm)\n");
    let _ = writeln!(
        fonte,
        "#grid(\n  columns: {},\n  gutter: 8mm,",
        grade.colunas.max(1)
    );

    for foto in &grade.fotos {
        let celula = match &foto.imagem {
            Some(imagem) => {
                *contador_fotos += 1;
                let nome = format!("foto-{}.{}", contador_fotos, imagem.formato.extensao());
                fs::write(temp_dir.path().join(&nome), &imagem.bytes)
                    .map_err(RenderError::WriteFoto)?;
                format!(
                    "box(width: 100%, height: 9cm, image(\"{}\", width: 100%, height: 100%, fit: \"contain\"))",
                    nome
                )
            }
            None => "box(width: 100%, height: 9cm, stroke: 0.5pt)[#align(center + horizon)[#text(size: 10pt)[Imagem não disponível]]]".to_string(),
        };

        let legenda = foto
            .descricao
            .as_deref()
            .map(|descricao| {
                format!(
                    " #linebreak() #text(size: 9pt, weight: \"bold\")[#\"{}\"]",
                    escapar_typst(descricao)
                )
            })
            .unwrap_or_default();

        let _ = writeln!(fonte, "  align(center)[#{}{}],", celula, legenda);
    }

    fonte.push_str(")\n");
    Ok(())
}

fn emitir_lista_servicos(fonte: &mut String, servicos: &[LinhaServico], inicio: usize) {
    emitir_faixa(fonte, "LISTA DE SERVIÇOS");
    fonte.push_str("#v(0.5cm)\n");

    for (indice, servico) in servicos.iter().enumerate() {
        let _ = writeln!(
            fonte,
            "#text(size: 13pt, weight: \"bold\")[#\"{}. {}\"] #linebreak() #h(0.8cm) #text(size: 10pt)[#\"Fotos: {}\"] #v(0.3cm)",
            inicio + indice + 1,
            escapar_typst(&servico.assunto),
            servico.quantidade_fotos
        );
    }
}

fn emitir_contracapa(fonte: &mut String, artes: &ArtesDisponiveis) {
    if artes.linha {
        fonte.push_str("#place(top + center, dy: -1cm, image(\"linha.png\", width: 120%))\n");
        fonte.push_str("#place(bottom + center, dy: 1cm, image(\"linha.png\", width: 120%))\n");
    }

    if artes.logo {
        fonte.push_str("#align(center + horizon, image(\"logo.png\", width: 11cm))\n");
    } else {
        fonte.push_str(
            "#align(center + horizon)[#text(size: 20pt, weight: \"bold\")[PREFEITURA DE SÃO PAULO]]\n",
        );
    }
}
