/*!
 * Informal style rewriting for Indonesian output.
 *
 * Machine translation into Indonesian comes back in a formal register
 * ("Saya tidak tahu apa yang Anda katakan"). Subtitles read better in the
 * everyday register ("aku nggak tau ..."), so every result for the `id`
 * locale goes through an ordered list of whole-word rewrites.
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Locale whose translations are rewritten
pub const INFORMAL_LOCALE: &str = "id";

/// Formal -> informal rewrites, applied top to bottom.
///
/// Phrases come before the single words they contain, otherwise
/// `tidak` would be rewritten before `tidak tahu` could match.
const INFORMAL_RULES: &[(&str, &str)] = &[
    // Phrases
    ("saya tidak tahu", "aku nggak tau"),
    ("aku tidak tahu", "aku nggak tau"),
    ("saya tidak mengerti", "aku nggak ngerti"),
    ("aku tidak mengerti", "aku nggak ngerti"),
    ("ini tidak mungkin", "ini nggak mungkin"),
    ("tidak mungkin", "nggak mungkin"),
    ("tidak apa-apa", "nggak apa-apa"),
    ("tidak masalah", "nggak masalah"),
    ("tidak peduli", "nggak peduli"),
    ("tidak usah", "nggak usah"),
    ("tidak perlu", "nggak perlu"),
    ("tidak dapat", "nggak bisa"),
    ("tidak ada", "nggak ada"),
    ("Tidak ada", "Nggak ada"),
    ("terima kasih", "makasih"),
    ("Terima kasih", "Makasih"),
    ("Anda semua", "kalian"),
    ("di mana", "dimana"),
    // Pronouns
    ("Anda", "kamu"),
    ("Ia", "dia"),
    ("Saya", "Aku"),
    ("saya", "aku"),
    ("Kami", "Kita"),
    ("kami", "kita"),
    // Verbs
    ("mengatakan", "bilang"),
    ("memberikan", "kasih"),
    ("membuat", "bikin"),
    ("memakan", "makan"),
    ("meminum", "minum"),
    ("mengambil", "ambil"),
    ("melihat", "lihat"),
    ("mendengarkan", "dengerin"),
    ("mendengar", "denger"),
    ("membawa", "bawa"),
    ("menggunakan", "pake"),
    ("melakukan", "lakuin"),
    ("mendapatkan", "dapet"),
    ("menemukan", "nemuin"),
    ("mencari", "cari"),
    ("menunggu", "tunggu"),
    ("membantu", "bantu"),
    ("membeli", "beli"),
    ("menjual", "jual"),
    ("mengerti", "ngerti"),
    ("mengetahui", "tau"),
    ("memahami", "paham"),
    ("menjadi", "jadi"),
    ("memiliki", "punya"),
    ("meninggalkan", "tinggalin"),
    ("mengikuti", "ikutin"),
    ("menunjukkan", "tunjukin"),
    ("menceritakan", "ceritain"),
    ("menjelaskan", "jelasin"),
    ("meminta", "minta"),
    ("menawarkan", "nawarin"),
    ("mengirim", "kirim"),
    ("menghubungi", "hubungin"),
    ("memutuskan", "mutusin"),
    ("memperbaiki", "benerin"),
    ("memulai", "mulai"),
    ("melanjutkan", "lanjut"),
    ("menyelesaikan", "selesain"),
    ("menyiapkan", "siapin"),
    ("menyuruh", "nyuruh"),
    ("menyampaikan", "nyampein"),
    ("menanyakan", "nanyain"),
    ("berkata", "bilang"),
    ("berbicara", "ngomong"),
    ("berjalan", "jalan"),
    ("berlari", "lari"),
    ("berusaha", "usaha"),
    ("berpikir", "mikir"),
    ("bertemu", "ketemu"),
    ("berangkat", "pergi"),
    // Single words
    ("apakah", ""),
    ("tetapi", "tapi"),
    ("namun", "tapi"),
    ("sedang", "lagi"),
    ("akan", "mau"),
    ("telah", "udah"),
    ("sudah", "udah"),
    ("belum", "belom"),
    ("tidak", "nggak"),
    ("Tidak", "Nggak"),
    ("kemudian", "terus"),
    ("seperti", "kayak"),
    ("bagaimana", "gimana"),
    ("mengapa", "kenapa"),
    ("hanya", "cuma"),
    ("karena", "soalnya"),
    ("dikarenakan", "soalnya"),
    ("agar", "biar"),
    ("untuk", "buat"),
    ("kepada", "ke"),
    ("segera", "cepet"),
    ("selalu", "terus"),
    ("terlalu", "kelewat"),
    ("benarkah", "beneran?"),
    ("benar", "bener"),
    ("permisi", "eh"),
    ("tersebut", "itu"),
    // Time and connectors
    ("selanjutnya", "abis ini"),
    ("sebelumnya", "tadi"),
    ("sebetulnya", "sebenernya"),
    ("sebenarnya", "sebenernya"),
    ("barangkali", "mungkin"),
    ("seharusnya", "harusnya"),
    ("sebaiknya", "mending"),
    ("silakan", "coba"),
    ("dipersilakan", "silakan"),
    ("dimohon", "tolong"),
    ("harap", "tolong"),
    ("apabila", "kalau"),
    ("jika", "kalau"),
    ("dapat", "bisa"),
];

static COMPILED_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    INFORMAL_RULES
        .iter()
        .map(|(formal, informal)| {
            // A dropped word takes its trailing blanks with it
            let pattern = if informal.is_empty() {
                format!(r"\b{}\b[ \t]*", regex::escape(formal))
            } else {
                format!(r"\b{}\b", regex::escape(formal))
            };
            (Regex::new(&pattern).unwrap(), *informal)
        })
        .collect()
});

/// Rewrite formal Indonesian into the everyday register
pub fn formalize_to_informal(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    COMPILED_RULES
        .iter()
        .fold(text.to_string(), |acc, (regex, informal)| {
            regex.replace_all(&acc, *informal).into_owned()
        })
}

/// Apply the informal rewrite when `target_language` is the informal locale
pub fn apply_for_locale(target_language: &str, text: String) -> String {
    if target_language == INFORMAL_LOCALE {
        formalize_to_informal(&text)
    } else {
        text
    }
}

/// Provider wrapper that rewrites every successful result for the informal locale
#[derive(Debug, Clone)]
pub struct InformalStyle {
    inner: Arc<dyn Provider>,
}

impl InformalStyle {
    pub fn new(inner: Arc<dyn Provider>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Provider for InformalStyle {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<String, ProviderError> {
        let translated = self
            .inner
            .translate(text, target_language, source_language)
            .await?;
        Ok(apply_for_locale(target_language, translated))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.inner.test_connection().await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
