//! Lookups: `!waaris` finds a university building, `!sikknel` reports the
//! latest serious call on the regional fire brigade pager.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eppo_proto::Operation;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::{Context, Groups, Handler};
use crate::error::{HandlerResult, PagerError};

/// Timeout for pager page requests.
const PAGER_TIMEOUT: Duration = Duration::from_secs(15);

const NOT_FOUND: &str = "Dat gebouw stond er voor mijn pensioen nog niet, geloof ik.";

/// Building number, address, occupants.
static BUILDINGS: &[&str] = &[
    "1111. Broerstraat 5, Academic building",
    "1113. O Kijk in t Jatstraat 41/41a, Administrative Information Provision (AIV)",
    "1114. O Kijk in t Jatstraat 39, University shop University shop",
    "1121. Oude Boteringestraat 44, Office of the University Administration building",
    "1124. Oude Boteringestraat 38, Faculty of Theology and Religious studies",
    "1126. Oude Boteringestraat 34, Faculty of Arts, HOVO",
    "1131. Oude Boteringestraat 52, Faculty of Philosophy",
    "1134. Broerstraat 9, Archeology (Arts)",
    "1211. Broerstraat 4, Library",
    "1212. Poststraat 6, Archeology (Arts)",
    "1213. O Kijk in t Jatstraat 7a, University museum",
    "1214. O Kijk in t Jatstraat 5/7, Legal theory (Law)",
    "1215. O Kijk in t Jatstraat 9, Legal Institute (Law)",
    "1311. O Kijk in t Jatstraat 26, Arts/Law/Language centre Harmoniecomplex",
    "1312. O Kijk in t Jatstraat 26, Arts/Law/Language centre Harmoniecomplex",
    "1321. O Kijk in t Jatstraat 28, Editorial office UK (university newspaper)",
    "1323. Turftorenstraat 21, Legal institute (Law)",
    "1324. Kleine Kromme Elleboog 7b, University hotel University hotel",
    "1325. Uurwerkersgang 10, student counsellors, psychological counsellors, Study support",
    "2111. Grote Rozenstraat 38, Pedagogy and Educational Sciences (GMW) Nieuwenhuis building",
    "2211. Grote kruisstraat 1/2, Psychology (GMW) Heymans building",
    "2212. Grote kruisstraat 2/1, Faculty of Behavioural and Social Sciences Munting building",
    "2221. Grote Rozenstraat 1, Sociology (GMW) Bouman building",
    "2222. Grote Rozenstraat 17, Sociology (GMW)",
    "2223. Grote Rozenstraat 15, Progamma & SWI",
    "2224. Grote Rozenstraat 3, Copyshop faculty of Behavioural and Social Sciences",
    "2231. N Kijk in t Jatstraat 70, Faculty Buro",
    "3111. Antonius Deusinglaan 2, Medical Sciences (MRI centre)",
    "3126. Bloemsingel 1, Lifelines",
    "3211. Antonius Deusinglaan 1, MWF complex (UMCG)",
    "4112. Sint Walburgstraat 22a/b/c, Student facilities + KEI",
    "4123. Bloemsingel 36/36a, Faculty of Behavioural and Social Sciences",
    "4321. Pelsterstraat 23, Faculty of Arts Pelsterpand",
    "4335. A-weg 30, Arctic Centre (Arts)",
    "4336. Munnikeholm 10, USVA cultural student centre",
    "4411. Visserstraat 47/49, Health, Safety and Environment Service/Confidential advisor",
    "4429. Oude Boteringestraat 23, Faculty of Arts",
    "4432. Oude Boteringestraat 19, Van Swinderenhuis",
    "4433. Oude Boteringestraat 13, Studium Generale",
    "5111. Nijenborgh 4, Physics, Chemistry, Industrial Engineering and Management (FWN) NCC",
    "5112. Nijenborgh 4, Physics, Chemistry, Industrial Engineering and Management (FWN) NCC",
    "5113. Nijenborgh 4, Physics, Chemistry, Industrial Engineering and Management (FWN) NCC",
    "5115. Nijenborgh 4, Physics, Chemistry, Industrial Engineering and Management (FWN) NCC",
    "5114. Nijenborgh 4, Physics, Chemistry, Industrial Engineering and Management (FWN) NCC",
    "5116. Nijenborgh 4, Physics, Chemistry, Industrial Engineering and Management (FWN) NCC",
    "5117. Nijenborgh 4, Physics, Chemistry, Industrial Engineering and Management (FWN) NCC",
    "5118. Nijenborgh 4, Physics, Chemistry, Industrial Engineering and Management (FWN) NCC",
    "5143. Zernikelaan 1, Security Porters lodge",
    "5161. Nijenborgh 9, Faculty board and general offices (FWN) Bernoulliborg",
    "5172. Nijenborgh 7, Biology, Life Sciences and Technology (FWN) Linnaeusborg",
    "5211. Blauwborgje 16, Sportcentre",
    "5231. Nadorstplein 2a, Transportation Service",
    "5236. Blauwborgje 8, University Services Department",
    "5256. Blauwborgje 8-10, University Services Department and Fundamental Informatica",
    "5263. Blauwborgje 4, Aletta Jacobs hal (examination hall)",
    "5411. Nettelbosje 2, Faculty of Economics and Business Duisenberg building",
    "5415. Landleven 1, Faculty of Spatial Sciences, CIT",
    "5416. Landleven 1, Faculty of Spatial Sciences, CIT, Teacher Education (GMW)",
    "5417. Landleven 1, Faculty of Spatial Sciences, CIT",
    "5419. Landleven 12, Astronomy/Kapteyn Institute Kapteynborg",
    "5431. Nettelbosje 1, Centre for Information Technology (CIT) Zernikeborg",
    "5711. Zernikelaan 25, KVI",
];

/// First building whose description contains `query`, ignoring case.
pub fn find_building(query: &str) -> Option<&'static str> {
    let query = query.to_lowercase();
    BUILDINGS
        .iter()
        .copied()
        .find(|entry| entry.to_lowercase().contains(&query))
}

/// Handler for `!waaris <query>`.
pub struct WhereIsHandler;

#[async_trait]
impl Handler for WhereIsHandler {
    async fn handle(&self, ctx: &mut Context<'_>, groups: &Groups) -> HandlerResult {
        ctx.reply(find_building(groups.get(1)).unwrap_or(NOT_FOUND))
            .await
    }
}

/// A page of pager messages.
#[async_trait]
pub trait PagerSource: Send + Sync {
    /// The page as HTML.
    async fn fetch_page(&self) -> Result<String, PagerError>;
}

/// Pager page fetched over HTTP.
pub struct HttpPagerSource {
    http: reqwest::Client,
    url: String,
}

impl HttpPagerSource {
    pub fn new(url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(PAGER_TIMEOUT)
            .user_agent(concat!("eppobot/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl PagerSource for HttpPagerSource {
    async fn fetch_page(&self) -> Result<String, PagerError> {
        let resp = self.http.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PagerError::Status(status.as_u16()));
        }
        Ok(resp.text().await?)
    }
}

/// The first priority 1 or 2 message on a pager page, on one line.
///
/// Messages are `<p class="bericht">` (or `id="bericht"`) elements; only
/// their leading text counts.
pub fn find_report(page: &str) -> Option<String> {
    let Ok(selector) = Selector::parse("p.bericht, p#bericht") else {
        return None;
    };
    let document = Html::parse_document(page);

    document
        .select(&selector)
        .filter_map(|element| element.text().next())
        .find(|text| text.contains("P 1") || text.contains("P 2"))
        .map(|text| text.replace(['\r', '\n'], " ").trim().to_string())
}

/// Handler for `!sikknel`.
///
/// The page is fetched on its own task. Nothing is said when the fetch fails
/// or the page has no serious call on it.
pub struct PagerHandler;

#[async_trait]
impl Handler for PagerHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _groups: &Groups) -> HandlerResult {
        let pager = Arc::clone(ctx.pager);
        let channel = ctx.msg.channel.clone();
        let out = ctx.out.clone();

        tokio::spawn(async move {
            let page = match pager.fetch_page().await {
                Ok(page) => page,
                Err(e) => {
                    warn!(error = %e, "Failed to fetch pager page");
                    return;
                }
            };
            let Some(report) = find_report(&page) else {
                debug!("No priority call on the pager page");
                return;
            };
            if out.send(Operation::reply(channel, report)).await.is_err() {
                debug!("Output closed before pager report was sent");
            }
        });

        Ok(())
    }
}
