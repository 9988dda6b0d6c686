//! Regex patterns, selectors and keywords for job page extraction.

/// Location hints in a search snippet, tried in order.
pub const LOCATION_PATTERNS: &[&str] = &[
    r"(?i)location:?\s*([^\.;]+)",
    r"(?i)in\s+([A-Za-z\s,]+(?:remote|hybrid|on-site))",
    r"(?i)(?:remote|hybrid|on-site)",
];

/// Salary ranges in dollars, currency-prefixed or currency-suffixed.
pub const SALARY_PATTERNS: &[&str] = &[
    r"(?i)(\$\d{1,3}(?:,\d{3})*(?:\.\d{2})?(?:\s*-\s*\$\d{1,3}(?:,\d{3})*(?:\.\d{2})?)?(?:\s*(?:per|a|/)\s*(?:year|yr|month|mo|hour|hr|annum))?)",
    r"(?i)((?:USD|EUR|GBP|AUD|CAD)\s*\d{1,3}(?:,\d{3})*(?:\.\d{2})?(?:\s*-\s*(?:USD|EUR|GBP|AUD|CAD)\s*\d{1,3}(?:,\d{3})*(?:\.\d{2})?)?)",
    r"(?i)(\d{1,3}(?:,\d{3})*(?:\.\d{2})?\s*(?:USD|EUR|GBP|AUD|CAD)(?:\s*-\s*\d{1,3}(?:,\d{3})*(?:\.\d{2})?\s*(?:USD|EUR|GBP|AUD|CAD))?)",
];

pub const JOB_TYPE_PATTERNS: &[&str] = &[
    r"(?i)(?:Job|Employment) Type:?\s*([^\n\.;]+)",
    r"(?i)(Full[- ]Time|Part[- ]Time|Contract|Temporary|Freelance|Permanent|Remote)",
];

pub const JOB_TYPE_KEYWORDS: &[&str] = &[
    "full-time",
    "part-time",
    "contract",
    "temporary",
    "freelance",
    "permanent",
    "remote",
    "hybrid",
];

/// CSS selectors for description containers on common job boards.
pub const DESCRIPTION_SELECTORS: &[&str] = &[
    "div.job-description",
    "div.description",
    "#job-description",
    ".jobSectionHeader",
    "[data-testid='jobDescriptionText']",
    ".description__text",
];

pub const DESCRIPTION_PATTERNS: &[&str] = &[
    r"(?is)(?:Job|Position) Description[:\n](.*?)(?:Requirements|Qualifications|Responsibilities|About)",
    r"(?is)About the job[:\n](.*?)(?:Requirements|Qualifications|Responsibilities)",
    r"(?is)Overview[:\n](.*?)(?:Requirements|Qualifications|Responsibilities)",
];

pub const REQUIREMENT_PATTERNS: &[&str] = &[
    r"(?is)Requirements?[:\n](.*?)(?:Benefits|Apply|About Us|Company)",
    r"(?is)Qualifications?[:\n](.*?)(?:Benefits|Apply|About Us|Company)",
    r"(?is)Skills[:\n](.*?)(?:Benefits|Apply|About Us|Company)",
];

/// Phrases that open a requirement sentence.
pub const SKILL_KEYWORDS: &[&str] = &[
    "experience with",
    "proficient in",
    "knowledge of",
    "degree in",
    "years of experience",
    "background in",
    "skill",
    "ability to",
];

/// Broader keywords used when a page yields no requirements at all.
pub const REQUIREMENT_KEYWORDS: &[&str] = &[
    "required",
    "qualification",
    "skill",
    "experience",
    "knowledge",
    "proficiency",
    "ability",
    "competency",
    "education",
    "degree",
];

pub const BENEFIT_PATTERNS: &[&str] = &[
    r"(?is)Benefits[:\n](.*?)(?:Apply|About Us|Company)",
    r"(?is)Perks[:\n](.*?)(?:Apply|About Us|Company)",
    r"(?is)What we offer[:\n](.*?)(?:Apply|About Us|Company)",
];

pub const BENEFIT_KEYWORDS: &[&str] = &[
    "health insurance",
    "dental insurance",
    "vision insurance",
    "401k",
    "retirement",
    "paid time off",
    "pto",
    "vacation",
    "remote work",
    "flexible",
    "bonus",
];

/// Bullet items (`*`, `-` or `•`) within a section.
pub const BULLET_PATTERN: &str = r"[\*\-•]\s*([^\n\*\-•]+)";

pub const APPLY_SELECTORS: &[&str] = &[
    "a.apply-button",
    "a.job-apply",
    "a[data-automation='job-detail-apply']",
    "a.btn-apply",
    ".jobsearch-IndeedApplyButton",
];

/// Anchor text that marks an apply link when no known selector matches.
pub const APPLY_TEXT: &str = "Apply";

pub const MAX_REQUIREMENTS: usize = 10;
pub const MAX_BENEFITS: usize = 8;

/// Minimum length of an unbulleted requirement line.
pub const MIN_REQUIREMENT_LINE: usize = 15;

/// Minimum length of an unbulleted benefit line.
pub const MIN_BENEFIT_LINE: usize = 10;

/// Minimum length of a keyword-derived requirement.
pub const MIN_KEYWORD_REQUIREMENT: usize = 10;
