//! Geração de nomes de arquivo dos PDFs.
//!
//! O nome é determinístico: tipo do relatório + slug do serviço + data.
//! A extensão `.pdf` é acrescentada pelo handler na hora da resposta.

use chrono::NaiveDate;

use super::models::TipoRelatorio;

/// Reduz um texto livre a um slug minúsculo separado por hífens.
pub fn sanitizar_slug(nome: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in nome.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            if !last_dash && !result.is_empty() {
                result.push('-');
                last_dash = true;
            }
        }
    }

    if result.is_empty() {
        return fallback.to_string();
    }

    result.trim_matches('-').to_string()
}

/// Nome de arquivo de um relatório individual.
pub fn nome_arquivo(
    tipo: TipoRelatorio,
    servico: Option<&str>,
    data: Option<NaiveDate>,
) -> String {
    let mut partes = vec!["relatorio".to_string(), tipo.slug().to_string()];

    if let Some(servico) = servico {
        let slug = sanitizar_slug(servico, "");
        if !slug.is_empty() {
            partes.push(slug);
        }
    }

    if let Some(data) = data {
        partes.push(data.format("%Y-%m-%d").to_string());
    }

    sanitize_filename::sanitize(partes.join("-"))
}

/// Nome de arquivo do mutirão consolidado do dia.
pub fn nome_arquivo_consolidado(data: Option<NaiveDate>) -> String {
    let mut nome = String::from("relatorio-mutirao-consolidado");
    if let Some(data) = data {
        nome.push('-');
        nome.push_str(&data.format("%Y-%m-%d").to_string());
    }
    sanitize_filename::sanitize(nome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    #[test]
    fn test_sanitizar_slug() {
        assert_eq!(sanitizar_slug("Zeladoria Urbana", "x"), "zeladoria-urbana");
        assert_eq!(sanitizar_slug("  Ação c/ Acumulador  ", "x"), "ao-c-acumulador");
        assert_eq!(sanitizar_slug("***", "relatorio"), "relatorio");
    }

    #[test]
    fn test_nome_arquivo_monumentos() {
        let nome = nome_arquivo(
            TipoRelatorio::Monumentos,
            Some("Conservação de Monumentos"),
            Some(data(2024, 1, 15)),
        );
        assert_eq!(nome, "relatorio-monumentos-conservao-de-monumentos-2024-01-15");
        assert!(nome.contains("monumentos"));
        assert!(nome.contains("2024"));
    }

    #[test]
    fn test_nome_arquivo_sem_servico() {
        let nome = nome_arquivo(TipoRelatorio::Rotineiros, None, Some(data(2025, 8, 1)));
        assert_eq!(nome, "relatorio-rotineiros-2025-08-01");
    }

    #[test]
    fn test_nome_arquivo_deterministico() {
        let a = nome_arquivo(TipoRelatorio::Evidencias, Some("ZELADORIA"), Some(data(2024, 2, 1)));
        let b = nome_arquivo(TipoRelatorio::Evidencias, Some("ZELADORIA"), Some(data(2024, 2, 1)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_nome_arquivo_consolidado() {
        assert_eq!(
            nome_arquivo_consolidado(Some(data(2024, 3, 10))),
            "relatorio-mutirao-consolidado-2024-03-10"
        );
        assert_eq!(nome_arquivo_consolidado(None), "relatorio-mutirao-consolidado");
    }
}
