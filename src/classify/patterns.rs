//! Pattern tables for document-type classification
//!
//! Keyword tables are searched in the lowercased full URL, path tables in
//! the lowercased URL path. `[\s\-_]*` lets a space, hyphen or underscore
//! (or nothing) separate the words of a phrase.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// Filing, presentation and transactional terms that point at documents
pub const PDF_KEYWORDS: &[&str] = &[
    r"investor[\s\-_]*day[\s\-_]*presentation",
    r"earnings[\s\-_]*presentation",
    r"supplementary[\s\-_]*information",
    r"non[\s\-_]*gaap[\s\-_]*reconciliation",
    r"non[\s\-_]*ifrs[\s\-_]*measures",
    r"esg[\s\-_]*presentation",
    r"sasb[\s\-_]*presentation",
    r"letter[\s\-_]*to[\s\-_]*shareholders",
    r"roadshow[\s\-_]*presentation",
    r"agm[\s\-_]*presentation",
    r"annual[\s\-_]*general[\s\-_]*meeting[\s\-_]*presentation",
    r"annual[\s\-_]*report",
    r"integrated[\s\-_]*report",
    r"interim[\s\-_]*report",
    r"quarterly[\s\-_]*report",
    r"semi[\s\-_]*annual[\s\-_]*report",
    r"management[\s\-_]*report",
    r"management[\s\-_]*commentary",
    r"md[\s\-_]*&?[\s\-_]*a\b",
    r"prox(?:y|ies)",
    r"proxy[\s\-_]*statement",
    r"contractual[\s\-_]*agreement",
    r"agm[\s\-_]*notice",
    r"egm[\s\-_]*notice",
    r"reorgani[sz]ation",
    r"restructur",
    r"bankruptcy",
    r"acquisition",
    r"disposal",
    r"legal[\s\-_]*action",
    r"material[\s\-_]*change",
    r"late[\s\-_]*filing",
    r"regulatory[\s\-_]*correspondence",
    r"bond[\s\-_]*prospectus",
    r"fixed[\s\-_]*income[\s\-_]*prospectus",
    r"debt[\s\-_]*prospectus",
    r"equity[\s\-_]*prospectus",
    r"ipo[\s\-_]*prospectus",
    r"securities[\s\-_]*registration",
    r"debt[\s\-_]*indenture",
    r"credit[\s\-_]*agreement",
    r"notice[\s\-_]*of[\s\-_]*offering",
    r"pre[\s\-_]*ipo",
    r"institutional[\s\-_]*ownership",
    r"beneficial[\s\-_]*ownership",
    r"capital[\s\-_]*change",
    r"stock[\s\-_]*option",
    r"tender[\s\-_]*offer",
    r"exchange[\s\-_]*offer",
    r"stock[\s\-_]*split",
    r"securities[\s\-_]*purchase",
    r"securities[\s\-_]*repurchase",
    r"securities[\s\-_]*sale",
    r"merger",
    r"takeover",
    r"dividend",
    r"auditor[\s\-_]*report",
    r"change[\s\-_]*in[\s\-_]*auditor",
    r"fund[\s\-_]*sheet",
    r"estma[\s\-_]*report",
    r"prepared[\s\-_]*remark",
    r"follow[\s\-_]*up[\s\-_]*transcript",
    r"integrated[\s\-_]*resource[\s\-_]*plan",
    r"scientific[\s\-_]*poster",
    r"scientific[\s\-_]*presentation",
    r"research[\s\-_]*publication",
];

pub const PDF_PATHS: &[&str] = &[
    r"/presentation",
    r"/investor[\-_]*day",
    r"/annual[\-_]*report",
    r"/interim[\-_]*report",
    r"/quarterly[\-_]*report",
    r"/proxy",
    r"/prospectus",
    r"/filing",
    r"/regulatory",
    r"/transcript",
    r"/prepared[\-_]*remarks",
    r"/financial[\-_]*report",
    r"/supplemental",
];

/// Company, leadership and product-listing terms that point at web pages
pub const HTML_KEYWORDS: &[&str] = &[
    r"/blog(?:s)?/",
    r"/insight(?:s)?/",
    r"about[\s\-_]*us",
    r"/about/",
    r"company[\s\-_]*history",
    r"/history/",
    r"mission[\s\-_]*(?:&|and)?[\s\-_]*vision",
    r"corporate[\s\-_]*information",
    r"management[\s\-_]*profile",
    r"board[\s\-_]*of[\s\-_]*director",
    r"/board/",
    r"executive[\s\-_]*team",
    r"/leadership/",
    r"/management/",
    r"/executives/",
    r"leadership[\s\-_]*committee",
    r"/suppliers/",
    r"/partners/",
    r"/customers/",
    r"strategic[\s\-_]*alliance",
    r"product[\s\-_]*listing",
    r"/products/",
    r"feature[\s\-_]*description",
    r"/features/",
    r"service[\s\-_]*listing",
    r"/services/",
    r"service[\s\-_]*description",
    r"solutions[\s\-_]*overview",
    r"/solutions/",
    r"service[\s\-_]*model",
];

pub const HTML_PATHS: &[&str] = &[
    r"/about",
    r"/team",
    r"/leadership",
    r"/management",
    r"/board",
    r"/executives",
    r"/products",
    r"/services",
    r"/solutions",
    r"/features",
    r"/blog",
    r"/suppliers",
    r"/partners",
    r"/customers",
];

/// News, ESG, governance and investor-relations terms published both as
/// documents and as pages
pub const BOTH_KEYWORDS: &[&str] = &[
    r"press[\s\-_]*release",
    r"news[\s\-_]*article",
    r"/news/",
    r"company[\s\-_]*announcement",
    r"/announcement",
    r"media[\s\-_]*center",
    r"/media/",
    r"newsroom",
    r"/newsroom/",
    r"operating[\s\-_]*metric",
    r"profit[\s\-_]*(?:&|and)?[\s\-_]*loss",
    r"shareholding[\s\-_]*pattern",
    r"corporate[\s\-_]*action",
    r"sustainab",
    r"/sustainability/",
    r"corporate[\s\-_]*social[\s\-_]*responsibility",
    r"\bcsr\b",
    r"environmental[\s\-_]*health[\s\-_]*safety",
    r"carbon[\s\-_]*disclosure",
    r"green[\s\-_]*report",
    r"\btcfd\b",
    r"climate[\s\-_]*risk",
    r"social[\s\-_]*report",
    r"human[\s\-_]*rights",
    r"diversity[\s\-_]*(?:&|and)?[\s\-_]*inclusion",
    r"\bgri\b",
    r"global[\s\-_]*reporting[\s\-_]*initiative",
    r"\bcdp\b",
    r"company[\s\-_]*polic",
    r"/policies/",
    r"/policy/",
    r"charter",
    r"/charter/",
    r"guideline",
    r"/guidelines/",
    r"code[\s\-_]*of[\s\-_]*ethics",
    r"/ethics/",
    r"governance[\s\-_]*polic",
    r"/governance/",
    r"corporate[\s\-_]*impact",
    r"esg[\s\-_]*report",
    r"white[\s\-_]*paper",
    r"/whitepaper",
    r"case[\s\-_]*stud",
    r"industry[\s\-_]*insight",
    r"thought[\s\-_]*leadership",
    r"fact[\s\-_]*sheet",
    r"fact[\s\-_]*book",
    r"product[\s\-_]*brochure",
    r"one[\s\-_]*pager",
    r"speech",
    r"/speeches/",
    r"executive[\s\-_]*commentary",
    r"industry[\s\-_]*trend",
    r"leadership[\s\-_]*insight",
    r"customer[\s\-_]*stor",
    r"project[\s\-_]*update",
    r"business[\s\-_]*update",
    r"activity[\s\-_]*report",
    r"infographic",
    r"results[\s\-_]*announcement",
    r"earnings[\s\-_]*update",
    r"revenue[\s\-_]*report",
    r"sales[\s\-_]*report",
    r"financial[\s\-_]*highlight",
    r"funding[\s\-_]*announcement",
    r"product[\s\-_]*launch",
    r"product[\s\-_]*specification",
    r"product[\s\-_]*spec",
    // investor relations
    r"investor[\s\-_]*relation",
    r"/ir/",
    r"/investors/",
    r"sec[\s\-_]*filing",
    r"email[\s\-_]*alert",
    r"subsidiar",
    r"credit[\s\-_]*rating",
    r"analyst[\s\-_]*report",
    r"research[\s\-_]*report",
    r"research[\s\-_]*/?[\s\-_]*analyst",
    r"privacy[\s\-_]*notice",
];

pub const BOTH_PATHS: &[&str] = &[
    r"/news",
    r"/press",
    r"/media",
    r"/newsroom",
    r"/announcement",
    r"/sustainability",
    r"/esg",
    r"/governance",
    r"/corporate[\-_]*impact",
    r"/corporate[\-_]*responsibility",
    r"/csr",
    r"/investor",
    r"/ir/",
    r"/events",
    r"/case[\-_]*stud",
    r"/whitepaper",
    r"/white[\-_]*paper",
    r"/reports",
    r"/updates",
    r"/highlights",
    r"/sec[\-_]*filing",
    r"/credit[\-_]*rating",
    r"/analyst",
    r"/research",
    r"/email[\-_]*alert",
    r"/subsidiar",
];

/// Legal, careers, support, commerce and third-party research mentions
pub const OUT_OF_SCOPE_KEYWORDS: &[&str] = &[
    r"privacy[\s\-_]*polic",
    r"terms[\s\-_]*(?:&|and)?[\s\-_]*condition",
    r"/terms/",
    r"/tos/",
    r"accessibility[\s\-_]*statement",
    r"/accessibility/",
    r"legal[\s\-_]*term",
    r"/legal/",
    r"clinical[\s\-_]*trial",
    r"drug[\s\-_]*prescription",
    r"fda[\s\-_]*correspondence",
    r"safety[\s\-_]*data[\s\-_]*sheet",
    r"/sds/",
    r"recipe",
    r"/careers/",
    r"/jobs/",
    r"job[\s\-_]*posting",
    r"/career/",
    r"/faq[s]?/",
    r"/contact/",
    r"/forum[s]?/",
    r"/chat/",
    r"/shop/",
    r"/cart/",
    r"/checkout/",
    r"/login/",
    r"/signup/",
    r"/register/",
    r"/account/",
    r"/my[\s\-_]*account/",
    r"/sitemap",
    r"/cookie",
    r"/disclaimer",
    r"/search",
    r"/404",
    r"/error",
    r"gartner",
    r"forrester",
    r"\bidc\b",
];

pub const OUT_OF_SCOPE_PATHS: &[&str] = &[
    r"/career",
    r"/jobs",
    r"/contact",
    r"/faq",
    r"/login",
    r"/signup",
    r"/register",
    r"/terms",
    r"/legal",
    r"/cookie",
    r"/accessibility",
    r"/sitemap",
    r"/search",
    r"/404",
    r"/error",
    r"/shop",
    r"/cart",
    r"/checkout",
    r"/forum",
    r"/chat",
    r"/account",
    r"/clinical[\-_]*trial",
    r"/sds",
    r"/disclaimer",
    r"/privacy/",
];

/// Investor-relations terms that suspend the out-of-scope checks
pub const IN_SCOPE_OVERRIDES: &[&str] = &[
    r"sec[\s\-_]*filing",
    r"email[\s\-_]*alert",
    r"privacy[\s\-_]*notice",
    r"subsidiar",
    r"credit[\s\-_]*rating",
    r"analyst[\s\-_]*report",
    r"research[\s\-_]*report",
    r"research[\s\-_]*analyst",
    r"investor[\s\-_]*relation",
    r"/ir/",
    r"/investors/",
    r"annual[\s\-_]*general[\s\-_]*meeting",
];

/// Matches that are rejected when the text right after them matches the
/// second pattern. `regex` has no look-around, so negative lookaheads live
/// here.
const RULE_EXCLUSIONS: &[(&str, &str)] =
    &[("dividend", r"^[\s\-_]*reinvestment[\s\-_]*stock")];

/// One compiled rule of a pattern table
#[derive(Debug)]
struct Rule {
    source: &'static str,
    regex: Regex,
    unless_followed_by: Option<Regex>,
}

impl Rule {
    fn is_match(&self, text: &str) -> bool {
        match &self.unless_followed_by {
            None => self.regex.is_match(text),
            Some(exclusion) => self
                .regex
                .find_iter(text)
                .any(|m| !exclusion.is_match(&text[m.end()..])),
        }
    }
}

/// An ordered list of case-insensitive rules; the first matching rule wins
#[derive(Debug)]
pub struct PatternTable {
    rules: Vec<Rule>,
}

impl PatternTable {
    /// Compiles a table, skipping (and logging) any pattern that fails to compile
    pub fn compile(sources: &[&'static str]) -> Self {
        let rules = sources
            .iter()
            .filter_map(|&source| {
                let regex = match case_insensitive(source) {
                    Ok(regex) => regex,
                    Err(e) => {
                        tracing::warn!("Skipping classifier pattern {}: {}", source, e);
                        return None;
                    }
                };

                let unless_followed_by = RULE_EXCLUSIONS
                    .iter()
                    .find(|(rule, _)| *rule == source)
                    .and_then(|(_, exclusion)| case_insensitive(exclusion).ok());

                Some(Rule {
                    source,
                    regex,
                    unless_followed_by,
                })
            })
            .collect();

        Self { rules }
    }

    /// Returns the source of the first rule that matches `text`
    pub fn first_match(&self, text: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.is_match(text))
            .map(|rule| rule.source)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

lazy_static! {
    pub static ref PDF_KEYWORD_TABLE: PatternTable = PatternTable::compile(PDF_KEYWORDS);
    pub static ref PDF_PATH_TABLE: PatternTable = PatternTable::compile(PDF_PATHS);
    pub static ref HTML_KEYWORD_TABLE: PatternTable = PatternTable::compile(HTML_KEYWORDS);
    pub static ref HTML_PATH_TABLE: PatternTable = PatternTable::compile(HTML_PATHS);
    pub static ref BOTH_KEYWORD_TABLE: PatternTable = PatternTable::compile(BOTH_KEYWORDS);
    pub static ref BOTH_PATH_TABLE: PatternTable = PatternTable::compile(BOTH_PATHS);
    pub static ref OUT_OF_SCOPE_KEYWORD_TABLE: PatternTable =
        PatternTable::compile(OUT_OF_SCOPE_KEYWORDS);
    pub static ref OUT_OF_SCOPE_PATH_TABLE: PatternTable =
        PatternTable::compile(OUT_OF_SCOPE_PATHS);
    pub static ref OVERRIDE_TABLE: PatternTable = PatternTable::compile(IN_SCOPE_OVERRIDES);
}
