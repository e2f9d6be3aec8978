//! Montagem das páginas de cada tipo de relatório.
//!
//! Toda a política de paginação de fotos mora aqui: ordenação por
//! `ordem` acontece na carga, o agrupamento em páginas acontece nestas
//! funções. As funções são puras (fotos já resolvidas entram, um
//! [`Documento`] sai), o que deixa a sequência de páginas testável sem
//! renderizar nada.

use crate::relatorio::datas::{formatar_data_br, formatar_data_capa, mes_ano_por_extenso};
use crate::relatorio::models::{
    nome_servico, nome_sub_regiao, EvidenciasRelatorio, MonumentosRelatorio, MutiraoRelatorio,
    RotineirosRelatorio, Secao,
};

use super::documento::{Capa, CabecalhoFotos, Documento, GradeFotos, LinhaServico, Pagina};
use super::images::FotoCarregada;

/// Fotos por página nas grades de evidências, registro, unified e
/// monumentos.
pub const FOTOS_POR_PAGINA: usize = 3;
/// Fotos por página nas seções de mutirão.
pub const FOTOS_POR_PAGINA_MUTIRAO: usize = 2;
/// Serviços listados por página no relatório de rotineiros.
pub const SERVICOS_POR_PAGINA: usize = 10;

/// Relatório de evidências: capa, ceil(N/3) páginas de fotos (a
/// primeira com o bloco descritor) e contracapa.
pub fn montar_evidencias(rel: &EvidenciasRelatorio, fotos: Vec<FotoCarregada>) -> Documento {
    let data = rel.data_referencia();
    let servico = nome_servico(&rel.tipo_servico).to_string();

    let capa = Capa {
        titulo: "RELATÓRIO DE EVIDÊNCIAS".to_string(),
        subtitulo: servico.clone(),
        info: vec![
            format!("Data: {}", rel.periodo_formatado()),
            format!(
                "Sub-região: {}",
                rel.sub.as_deref().map(nome_sub_regiao).unwrap_or("Não informado")
            ),
            format!("Local: {}", rel.local.as_deref().unwrap_or("Não informado")),
        ],
        data_extenso: data.map(formatar_data_capa).unwrap_or_default(),
    };

    let cabecalho = CabecalhoFotos {
        campos: vec![
            (
                "PREFEITURA REGIONAL".to_string(),
                rel.sub
                    .as_deref()
                    .map(nome_sub_regiao)
                    .unwrap_or("Não informado")
                    .to_string(),
            ),
            ("Serviço(s)".to_string(), servico),
            (
                "Local / Evento".to_string(),
                rel.local.clone().unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Descrição".to_string(),
                rel.descricao.clone().unwrap_or_else(|| "N/A".to_string()),
            ),
            ("Período / Data".to_string(), rel.periodo_formatado()),
        ],
    };

    let mut paginas = vec![Pagina::Capa(capa)];
    paginas.extend(paginas_de_fotos(
        "EVIDÊNCIAS FOTOGRÁFICAS",
        fotos,
        FOTOS_POR_PAGINA,
        Some(cabecalho),
    ));
    paginas.push(Pagina::Contracapa);

    Documento {
        titulo: "Relatório de Evidências".to_string(),
        paginas,
    }
}

/// Relatório de mutirão: capa, quantitativo (se houver itens), páginas
/// de fotos por seção e contracapa.
///
/// `fotos_por_secao` é paralelo a `rel.secoes`, já na ordem de carga.
pub fn montar_mutirao(rel: &MutiraoRelatorio, fotos_por_secao: Vec<Vec<FotoCarregada>>) -> Documento {
    let sub_regioes: Vec<&str> = rel.secoes.iter().map(|s| nome_sub_regiao(&s.sub)).collect();
    let sub_texto = if sub_regioes.is_empty() {
        "Não informado".to_string()
    } else {
        sub_regioes.join(", ")
    };

    let capa = Capa {
        titulo: "RELATÓRIO DE MUTIRÃO".to_string(),
        subtitulo: rel
            .title
            .clone()
            .unwrap_or_else(|| "Mutirão de Zeladoria".to_string()),
        info: vec![
            format!(
                "Data: {}",
                rel.data.map(formatar_data_br).unwrap_or_else(|| "Não informado".to_string())
            ),
            format!("Sub-regiões: {}", sub_texto),
            format!("Total de Seções: {}", rel.secoes.len()),
        ],
        data_extenso: rel.data.map(formatar_data_capa).unwrap_or_default(),
    };

    let mut paginas = vec![Pagina::Capa(capa)];

    if !rel.quantitativo.is_empty() {
        paginas.push(Pagina::Quantitativo {
            itens: rel.quantitativo.clone(),
        });
    }

    for (indice, (secao, fotos)) in rel.secoes.iter().zip(fotos_por_secao).enumerate() {
        paginas.extend(paginas_de_secao(indice, secao, fotos));
    }

    paginas.push(Pagina::Contracapa);

    Documento {
        titulo: "Relatório de Mutirão".to_string(),
        paginas,
    }
}

/// Relatório mensal de rotineiros: capa com mês/ano, listagem paginada
/// de serviços e contracapa.
pub fn montar_rotineiros(rel: &RotineirosRelatorio) -> Documento {
    let capa = Capa {
        titulo: "SERVIÇOS ROTINEIROS".to_string(),
        subtitulo: rel
            .data
            .map(|d| mes_ano_por_extenso(d).to_uppercase())
            .unwrap_or_default(),
        info: vec![
            format!("Total de Serviços: {}", rel.servicos.len()),
            format!(
                "Sub-região: {}",
                rel.sub.as_deref().map(nome_sub_regiao).unwrap_or("Não informado")
            ),
        ],
        data_extenso: rel.data.map(formatar_data_capa).unwrap_or_default(),
    };

    let mut paginas = vec![Pagina::Capa(capa)];

    let linhas: Vec<LinhaServico> = rel
        .servicos
        .iter()
        .map(|s| LinhaServico {
            assunto: s.assunto.clone(),
            quantidade_fotos: s.fotos.len(),
        })
        .collect();

    let mut inicio = 0;
    let mut restantes = linhas;
    while !restantes.is_empty() {
        let corte = restantes.len().min(SERVICOS_POR_PAGINA);
        let pagina: Vec<LinhaServico> = restantes.drain(..corte).collect();
        paginas.push(Pagina::ListaServicos {
            servicos: pagina,
            inicio,
        });
        inicio += corte;
    }

    paginas.push(Pagina::Contracapa);

    Documento {
        titulo: "Serviços Rotineiros".to_string(),
        paginas,
    }
}

/// Relatório de monumentos: capa com os dados do monumento, páginas de
/// fotos quando existirem e contracapa.
pub fn montar_monumentos(rel: &MonumentosRelatorio, fotos: Vec<FotoCarregada>) -> Documento {
    let servico = nome_servico(&rel.tipo_servico).to_string();

    let capa = Capa {
        titulo: "RELATÓRIO DE MONUMENTOS".to_string(),
        subtitulo: servico.clone(),
        info: vec![
            format!(
                "Data: {}",
                rel.data.map(formatar_data_br).unwrap_or_else(|| "Não informado".to_string())
            ),
            format!(
                "Sub-região: {}",
                rel.sub.as_deref().map(nome_sub_regiao).unwrap_or("Não informado")
            ),
            format!(
                "Monumento: {}",
                rel.monumento.as_deref().unwrap_or("Não informado")
            ),
            format!("Local: {}", rel.local.as_deref().unwrap_or("Não informado")),
        ],
        data_extenso: rel.data.map(formatar_data_capa).unwrap_or_default(),
    };

    let cabecalho = CabecalhoFotos {
        campos: vec![
            (
                "PREFEITURA REGIONAL".to_string(),
                rel.sub
                    .as_deref()
                    .map(nome_sub_regiao)
                    .unwrap_or("Não informado")
                    .to_string(),
            ),
            ("Serviço(s)".to_string(), servico),
            (
                "Monumento".to_string(),
                rel.monumento.clone().unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Local".to_string(),
                rel.local.clone().unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Descrição".to_string(),
                rel.descricao.clone().unwrap_or_else(|| "N/A".to_string()),
            ),
        ],
    };

    let mut paginas = vec![Pagina::Capa(capa)];
    paginas.extend(paginas_de_fotos(
        "REGISTRO FOTOGRÁFICO",
        fotos,
        FOTOS_POR_PAGINA,
        Some(cabecalho),
    ));
    paginas.push(Pagina::Contracapa);

    Documento {
        titulo: "Relatório de Monumentos".to_string(),
        paginas,
    }
}

/// Agrupa fotos em páginas de tamanho fixo. O bloco descritor sai
/// apenas na primeira página do grupo.
fn paginas_de_fotos(
    titulo: &str,
    fotos: Vec<FotoCarregada>,
    capacidade: usize,
    cabecalho: Option<CabecalhoFotos>,
) -> Vec<Pagina> {
    let mut paginas = Vec::new();
    let mut cabecalho = cabecalho;
    let mut restantes = fotos;
    let mut inicio = 0;

    while !restantes.is_empty() {
        let corte = restantes.len().min(capacidade);
        let pagina: Vec<FotoCarregada> = restantes.drain(..corte).collect();
        paginas.push(Pagina::GradeFotos(GradeFotos {
            titulo: titulo.to_string(),
            cabecalho: cabecalho.take(),
            fotos: pagina,
            colunas: capacidade,
            inicio,
        }));
        inicio += corte;
    }

    paginas
}

/// Páginas de uma seção de mutirão. Seção sem fotos ainda gera uma
/// página com o bloco descritor.
fn paginas_de_secao(indice: usize, secao: &Secao, fotos: Vec<FotoCarregada>) -> Vec<Pagina> {
    let titulo = format!("{}. {}", indice + 1, nome_sub_regiao(&secao.sub));

    let mut campos = vec![(
        "PREFEITURA REGIONAL".to_string(),
        nome_sub_regiao(&secao.sub).to_string(),
    )];
    if let Some(local) = &secao.local {
        campos.push(("Local".to_string(), local.clone()));
    }
    if let Some(descricao) = &secao.descricao {
        campos.push(("Descrição".to_string(), descricao.clone()));
    }
    let cabecalho = CabecalhoFotos { campos };

    if fotos.is_empty() {
        return vec![Pagina::GradeFotos(GradeFotos {
            titulo,
            cabecalho: Some(cabecalho),
            fotos: Vec::new(),
            colunas: FOTOS_POR_PAGINA_MUTIRAO,
            inicio: 0,
        })];
    }

    paginas_de_fotos(&titulo, fotos, FOTOS_POR_PAGINA_MUTIRAO, Some(cabecalho))
}
