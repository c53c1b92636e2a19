/*!

This is the long-form manual for `camp_ranking` and `campreport`.

## Input data

A report is computed from one snapshot of three collections:
* the roster: who is at the camp, in which group and team
* the stamp sheets: the stamps earned and the pin completion of each student
* the level tests: the score of each student at the level test

Only the roster is mandatory. A student without a stamp sheet has 0 stamps and
no pin. A student without a level test has empty level test columns.

## Input formats

The following formats are supported for every collection:
* `json` a list of objects, or an object that wraps the list under `data`
* `csv` Comma Separated Values, with the field names in the first row
* `xlsx` an Excel worksheet, with the field names in the first row

### `json`

This is the format of the exports of the camp web application:

```text
{ "data": [
  { "id": "s01", "name": "김민지", "englishName": "Minji Kim", "studentGroup": "Red", "team": 1 }
] }
```

### `csv`

```text
student_id,stamp_count,korean_pin_complete,english_pin_complete,updated_at
s01,12,true,true,2024-07-20T09:00:00Z
s02,4,true,false,2024-07-20T09:00:00Z
```

All the values are read as text and converted when the record is interpreted.

### `xlsx`

The worksheet is selected with `excelWorksheetName`. Without it, the only
worksheet of the file is used, or the first one if there are several.

## Fields

Field names are accepted in both the camel case and the snake case spelling.
Numbers may be written as text and text may be written as numbers. Blank values
are treated as absent.

Roster:
 - `id` (or `student_id`, mandatory): records without an id are skipped
 - `name`, `koreanName`: the display name is `name`, then `koreanName`
 - `englishName`, `churchName`
 - `studentGroup`: one of the group labels, case does not matter
 - `team`: a team number between 1 and 5
 - `attended`: `true`/`false`, `yes`/`no`, `y`/`n`, `o`/`x`, `1`/`0`

Stamp sheets:
 - `student_id` (or `id`, mandatory)
 - `stamp_count`: negative counts are read as 0
 - `korean_pin_complete`, `english_pin_complete`
 - `studentGroup`, `team`: used when the roster leaves them blank
 - `updated_at`: when a student has several sheets, the latest one is used

Level tests:
 - `student_id` (mandatory)
 - `total_score`, `max_score`, `percentage`
 - `test_date`: when a student has several results, the latest one is used

## Configuration

`campreport` takes a configuration file in JSON:

```text
{
  "outputSettings": {
    "campName": "Summer Camp 2024",
    "campDate": "2024-07-20",
    "outputPath": "report.json"
  },
  "rosterSources": [ { "provider": "json", "filePath": "roster.json" } ],
  "stampSources": [
    { "provider": "csv", "filePath": "stamps.csv" },
    { "provider": "xlsx", "filePath": "stamps.xlsx", "excelWorksheetName": "Stamps" }
  ],
  "levelTestSources": [ { "provider": "json", "filePath": "level_tests.json" } ]
}
```

File paths are relative to the directory of the configuration file.

Each collection may list several sources, for example the primary export and a
backup. All of them are read. A source that cannot be read is ignored with a
warning, and the source with the most records is used.

Without a configuration file, the sources are given on the command line with
`--roster`, `--stamps` and `--level-tests`. The format is then guessed from the
file extension.

## Rules

The camp has 7 groups (Red, Orange, Yellow, Green, Blue, Navy, Purple) of 5
teams each.

Overall ranking: all the students, by decreasing stamp count. Ranks are
sequential: students with the same count get different ranks, in roster order.
The top 10% of the ranking, rounded up, are the MVPs.

Team ranking: the average of a team is its stamp total divided by the number
of its members with at least one stamp. Within each group the teams are ranked
by decreasing average, the lower team number first on equal averages. The
first team gets gold, the second silver, the next three bronze. Teams without
members are not ranked.

Unassigned students: students whose group or team is missing or invalid. They
still appear in the overall ranking and get their own ranking. The MVP
mark always comes from the overall ranking.

Pin completion: each student counts for the Korean pin, the English pin, both
pins or no pin. Students are counted by group, or as unassigned when their
group is missing or invalid. Percentages are rounded to one decimal.

## Report

The report is a list of sheets, always in this order:
* `award-summary` the winners and the top student of every group
* `team-ranking` the populated teams of every group
* `pin-completion-summary` one row per group, then the unassigned and the total
* `overall` the overall ranking
* one sheet per populated team, named like `Red Team 1`
* `unassigned` the ranking of the unassigned students

*/
