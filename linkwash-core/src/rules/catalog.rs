//! The built-in rule catalog.
//!
//! Order matters: it is the registration order of the default rule set and
//! therefore the order in which matching rules are folded over a URL.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::CleanerError;
use crate::rule::Rule;
use crate::rules::{
    DomainMatcher, DomainRewriter, EmptyParameterStripper, ParameterStripper, QueryAllowList,
    RedirectExtractor, ShortLinkExpander,
};

pub const AMAZON_PRODUCT: &str = "amazon_product";
pub const AMAZON: &str = "amazon";
pub const AMAZON_SMILE: &str = "amazon_smile";
pub const AOL_SEARCH: &str = "aol_search";
pub const AT_ANALYTICS: &str = "at_analytics";
pub const EBAY: &str = "ebay";
pub const EMPTY_PARAMETERS: &str = "empty_parameters";
pub const FACEBOOK: &str = "facebook";
pub const FLIPKART: &str = "flipkart";
pub const GEORIOT: &str = "georiot";
pub const GOOGLE_ANALYTICS: &str = "google_analytics";
pub const GOOGLE_SEARCH: &str = "google_search";
pub const IKEA: &str = "ikea";
pub const INSTAGRAM: &str = "instagram";
pub const JDOQOCY: &str = "jdoqocy";
pub const NETFLIX: &str = "netflix";
pub const SESSION_IDS: &str = "session_ids";
pub const SPOTIFY: &str = "spotify";
pub const SUBSTACK: &str = "substack";
pub const THREADS: &str = "threads";
pub const TWITTER: &str = "twitter";
pub const WEBTREKK: &str = "webtrekk";
pub const YAHOO_SEARCH: &str = "yahoo_search";
pub const YOUTUBE_REDIRECT: &str = "youtube_redirect";
pub const YOUTUBE_SHORT_URL: &str = "youtube_short_url";
pub const YOUTUBE: &str = "youtube";

/// Ids of every built-in rule, for collision checks on user-defined rules.
pub static BUILT_IN_IDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        AMAZON_PRODUCT, AMAZON, AMAZON_SMILE, AOL_SEARCH, AT_ANALYTICS, EBAY, EMPTY_PARAMETERS,
        FACEBOOK, FLIPKART, GEORIOT, GOOGLE_ANALYTICS, GOOGLE_SEARCH, IKEA, INSTAGRAM, JDOQOCY,
        NETFLIX, SESSION_IDS, SPOTIFY, SUBSTACK, THREADS, TWITTER, WEBTREKK, YAHOO_SEARCH,
        YOUTUBE_REDIRECT, YOUTUBE_SHORT_URL, YOUTUBE,
    ]
    .into_iter()
    .collect()
});

const AMAZON_HOST: &str = r"amazon\.[a-z.]+";
const YOUTUBE_HOST: &str = r"youtube\.com";

/// Builds every built-in rule in registration order.
pub fn default_rules() -> Result<Vec<Arc<dyn Rule>>, CleanerError> {
    let rules: Vec<Arc<dyn Rule>> = vec![
        Arc::new(ShortLinkExpander::new(
            AMAZON_PRODUCT,
            "Amazon (product)",
            DomainMatcher::host_path(AMAZON_PRODUCT, AMAZON_HOST, r"(?:[^?#]*/)?(?:dp|gp/product)/")?,
            r"(?i:amazon\.([a-z.]+))/(?:[^?#]*/)?(?i:dp|gp/product)/([A-Z0-9]{10})",
            "https://www.amazon.$1/dp/$2",
        )?),
        Arc::new(ParameterStripper::with_names(
            AMAZON,
            "Amazon",
            DomainMatcher::host(AMAZON, AMAZON_HOST)?,
            &[
                "ref", "ref_", "pd_rd_w", "pd_rd_wg", "pd_rd_r", "pd_rd_i", "pf_rd_p", "pf_rd_r",
                "pf_rd_s", "pf_rd_t", "pf_rd_i", "pf_rd_m", "content-id", "psc", "th", "linkCode",
                "linkId", "tag", "qid", "sr", "crid", "sprefix", "dib", "dib_tag", "_encoding",
                "smid", "spLa", "sbo",
            ],
        )?),
        Arc::new(DomainRewriter::new(
            AMAZON_SMILE,
            "Amazon Smile",
            r"^(?:https?://)?(smile\.amazon)\.",
            "www.amazon",
        )?),
        Arc::new(RedirectExtractor::new(
            AOL_SEARCH,
            "AOL search",
            DomainMatcher::host_path(AOL_SEARCH, r"search\.aol\.com", "click/")?,
            r"/RU=([^/]+)/",
        )?),
        Arc::new(ParameterStripper::with_prefixes(
            AT_ANALYTICS,
            "AT Internet (at_*)",
            DomainMatcher::Any,
            "at_",
        )?),
        Arc::new(QueryAllowList::strip_all(
            EBAY,
            "eBay",
            DomainMatcher::host_path(EBAY, r"ebay\.[a-z.]+", "itm/")?,
        )),
        Arc::new(EmptyParameterStripper::new(EMPTY_PARAMETERS, "Empty parameters")),
        Arc::new(ParameterStripper::with_prefixes(
            FACEBOOK,
            "Facebook (fb*)",
            DomainMatcher::Any,
            "fb|mibextid",
        )?),
        Arc::new(QueryAllowList::new(
            FLIPKART,
            "Flipkart",
            DomainMatcher::host(FLIPKART, r"flipkart\.com")?,
            &["pid", "q"],
        )),
        Arc::new(RedirectExtractor::for_parameter(
            GEORIOT,
            "GeoRiot",
            DomainMatcher::host_path(GEORIOT, r"georiot\.[a-z.]+", r"Proxy\.ashx")?,
            "GR_URL",
        )?),
        Arc::new(ParameterStripper::with_prefixes(
            GOOGLE_ANALYTICS,
            "Google Analytics (utm_*, ga_*)",
            DomainMatcher::Any,
            "utm_|ga_|_ga|gclid|dclid|gbraid|wbraid",
        )?),
        Arc::new(RedirectExtractor::for_parameter(
            GOOGLE_SEARCH,
            "Google search",
            DomainMatcher::host_path(GOOGLE_SEARCH, r"google\.[a-z.]+", r"url\?")?,
            "url|q",
        )?),
        Arc::new(QueryAllowList::strip_all(
            IKEA,
            "IKEA",
            DomainMatcher::host(IKEA, r"ikea\.com")?,
        )),
        Arc::new(ParameterStripper::with_names(
            INSTAGRAM,
            "Instagram",
            DomainMatcher::host(INSTAGRAM, r"instagram\.com")?,
            &["igshid", "igsh"],
        )?),
        Arc::new(RedirectExtractor::for_parameter(
            JDOQOCY,
            "Jdoqocy",
            DomainMatcher::host_path(JDOQOCY, r"jdoqocy\.com", "click-")?,
            "url",
        )?),
        Arc::new(ParameterStripper::with_names(
            NETFLIX,
            "Netflix",
            DomainMatcher::host(NETFLIX, r"netflix\.com")?,
            &["trkid", "trackId", "tctx", "vlang", "s", "t"],
        )?),
        Arc::new(ParameterStripper::with_names_ignore_case(
            SESSION_IDS,
            "Session IDs",
            DomainMatcher::Any,
            &["sid", "sessionid", "session_id", "phpsessid", "jsessionid", "aspsessionid", "cfid", "cftoken"],
        )?),
        Arc::new(ParameterStripper::with_names(
            SPOTIFY,
            "Spotify",
            DomainMatcher::host(SPOTIFY, r"spotify\.com")?,
            &["si", "context"],
        )?),
        Arc::new(QueryAllowList::strip_all(
            SUBSTACK,
            "Substack",
            DomainMatcher::host(SUBSTACK, r"substack\.com")?,
        )),
        Arc::new(QueryAllowList::strip_all(
            THREADS,
            "Threads",
            DomainMatcher::host(THREADS, r"threads\.(?:net|com)")?,
        )),
        Arc::new(ParameterStripper::with_names(
            TWITTER,
            "Twitter / X",
            DomainMatcher::host(TWITTER, r"(?:twitter|x)\.com")?,
            &["s", "t", "ref_src", "ref_url"],
        )?),
        Arc::new(ParameterStripper::with_prefixes(
            WEBTREKK,
            "Webtrekk (wt_*)",
            DomainMatcher::Any,
            r"wt_|wt\.",
        )?),
        Arc::new(RedirectExtractor::new(
            YAHOO_SEARCH,
            "Yahoo search",
            DomainMatcher::host_path(YAHOO_SEARCH, r"search\.yahoo\.com", r"(?:[^?#]*/)?RU=")?,
            r"/RU=([^/]+)/",
        )?),
        Arc::new(RedirectExtractor::for_parameter(
            YOUTUBE_REDIRECT,
            "YouTube redirect",
            DomainMatcher::host_path(YOUTUBE_REDIRECT, YOUTUBE_HOST, "redirect")?,
            "q",
        )?),
        Arc::new(ShortLinkExpander::new(
            YOUTUBE_SHORT_URL,
            "YouTube short URL",
            DomainMatcher::host(YOUTUBE_SHORT_URL, r"youtu\.be")?,
            r"^(?:https?://)?(?:www\.)?youtu\.be/([A-Za-z0-9_-]+)",
            "https://www.youtube.com/watch?v=$1",
        )?
        .keeping_query()),
        Arc::new(QueryAllowList::new(
            YOUTUBE,
            "YouTube",
            DomainMatcher::host_path(YOUTUBE, YOUTUBE_HOST, "(?:watch|results|playlist)")?,
            &["v", "search_query", "list", "t"],
        )),
    ];

    Ok(rules)
}
